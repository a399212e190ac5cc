//! SQLite-backed credential store.
//!
//! Three tables, all created on open:
//!
//! - `secrets`        — single row (id = 1) holding the base64-encoded
//!   key-derivation salt
//! - `master_password` — single row (id = 1) holding the passphrase
//!   verifier blob
//! - `passwords`      — one row per stored entry; the `password` column
//!   is an opaque ciphertext token, never plaintext
//!
//! Pure storage: no cryptographic logic lives here.  Every operation
//! returns a `Result` so callers can tell "no rows" apart from a
//! storage failure.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::{PasskeepError, Result};

/// A single entry's listing data.  Never carries ciphertext.
#[derive(Debug, Clone)]
pub struct SecretMetadata {
    pub id: i64,
    pub website: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// SQLite-backed storage for the vault.
pub struct CredentialStore {
    conn: Connection,
}

impl CredentialStore {
    /// Open (or create) the vault database at `path`.
    ///
    /// Creates parent directories and the schema as needed, and
    /// restricts the file to owner-only permissions on Unix.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(path, perms);
        }

        Self::init(conn)
    }

    /// Open an in-memory store.  Useful for tests and tooling.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS secrets (
                id              INTEGER PRIMARY KEY CHECK (id = 1),
                encryption_salt TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS master_password (
                id            INTEGER PRIMARY KEY CHECK (id = 1),
                password_hash BLOB NOT NULL,
                created_at    TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS passwords (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                website    TEXT NOT NULL,
                username   TEXT NOT NULL,
                password   TEXT NOT NULL,
                created_at TEXT NOT NULL
            );",
        )?;

        Ok(Self { conn })
    }

    // ------------------------------------------------------------------
    // Salt
    // ------------------------------------------------------------------

    /// Read the key-derivation salt, if one has been created yet.
    pub fn salt(&self) -> Result<Option<Vec<u8>>> {
        let encoded: Option<String> = self
            .conn
            .query_row(
                "SELECT encryption_salt FROM secrets WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        match encoded {
            Some(s) => {
                let bytes = BASE64.decode(&s).map_err(|_| {
                    PasskeepError::ConfigError(
                        "stored encryption salt is not valid base64".into(),
                    )
                })?;
                Ok(Some(bytes))
            }
            None => Ok(None),
        }
    }

    /// Persist the key-derivation salt.  Write-once: refuses to replace
    /// an existing salt, since every stored ciphertext depends on it.
    pub fn set_salt(&self, salt: &[u8]) -> Result<()> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO secrets (id, encryption_salt) VALUES (1, ?1)",
            params![BASE64.encode(salt)],
        )?;

        if changed == 0 {
            return Err(PasskeepError::InvalidInput(
                "an encryption salt already exists and cannot be replaced".into(),
            ));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Master verifier
    // ------------------------------------------------------------------

    /// Read the stored passphrase verifier, if any.
    pub fn verifier(&self) -> Result<Option<Vec<u8>>> {
        Ok(self
            .conn
            .query_row(
                "SELECT password_hash FROM master_password WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .optional()?)
    }

    /// Store the passphrase verifier, replacing any previous one.
    pub fn set_verifier(&self, hash: &[u8]) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR REPLACE INTO master_password (id, password_hash, created_at)
             VALUES (1, ?1, ?2)",
            params![hash, now],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Entry CRUD
    // ------------------------------------------------------------------

    /// Insert a new entry and return its store-assigned id.
    pub fn insert(&self, website: &str, username: &str, ciphertext: &str) -> Result<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO passwords (website, username, password, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![website, username, ciphertext, now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Partially update an entry's username and/or ciphertext.
    ///
    /// At least one field must be provided; an unknown id is reported as
    /// `RecordNotFound`.
    pub fn update(
        &self,
        id: i64,
        username: Option<&str>,
        ciphertext: Option<&str>,
    ) -> Result<()> {
        let changed = match (username, ciphertext) {
            (None, None) => {
                return Err(PasskeepError::InvalidInput(
                    "nothing to update — provide a new username, a new password, or both".into(),
                ));
            }
            (Some(u), None) => self.conn.execute(
                "UPDATE passwords SET username = ?1 WHERE id = ?2",
                params![u, id],
            )?,
            (None, Some(c)) => self.conn.execute(
                "UPDATE passwords SET password = ?1 WHERE id = ?2",
                params![c, id],
            )?,
            (Some(u), Some(c)) => self.conn.execute(
                "UPDATE passwords SET username = ?1, password = ?2 WHERE id = ?3",
                params![u, c, id],
            )?,
        };

        if changed == 0 {
            return Err(PasskeepError::RecordNotFound(id));
        }
        Ok(())
    }

    /// Delete an entry.  Returns whether a row existed; deleting a
    /// nonexistent id is not an error.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM passwords WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// List all entries, newest first, without ciphertext.
    pub fn list_metadata(&self) -> Result<Vec<SecretMetadata>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, website, username, created_at FROM passwords ORDER BY id DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            let ts: String = row.get(3)?;
            let created_at = DateTime::parse_from_rfc3339(&ts)
                .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

            Ok(SecretMetadata {
                id: row.get(0)?,
                website: row.get(1)?,
                username: row.get(2)?,
                created_at,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// Fetch one entry's ciphertext token, or `None` if the id is unknown.
    pub fn ciphertext(&self, id: i64) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT password FROM passwords WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?)
    }

    /// Fetch every entry's (id, ciphertext) pair for bulk re-keying.
    pub fn all_ciphertexts(&self) -> Result<Vec<(i64, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, password FROM passwords ORDER BY id")?;

        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut pairs = Vec::new();
        for row in rows {
            pairs.push(row?);
        }
        Ok(pairs)
    }

    // ------------------------------------------------------------------
    // Re-keying
    // ------------------------------------------------------------------

    /// Replace the verifier and every listed ciphertext in one SQLite
    /// transaction.
    ///
    /// Used by the passphrase-change protocol: either the new verifier
    /// and all re-encrypted tokens land together, or the vault keeps its
    /// previous state.  A mid-batch failure (including an id that no
    /// longer exists) rolls everything back.
    pub fn commit_rekey(&mut self, verifier: &[u8], items: &[(i64, String)]) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT OR REPLACE INTO master_password (id, password_hash, created_at)
             VALUES (1, ?1, ?2)",
            params![verifier, now],
        )?;

        for (id, ciphertext) in items {
            let changed = tx.execute(
                "UPDATE passwords SET password = ?1 WHERE id = ?2",
                params![ciphertext, id],
            )?;
            if changed == 0 {
                // Dropping the transaction rolls back the batch.
                return Err(PasskeepError::RecordNotFound(*id));
            }
        }

        tx.commit()?;
        Ok(())
    }
}
