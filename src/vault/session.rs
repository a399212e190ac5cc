//! The vault session: authentication gate and re-keying orchestrator.
//!
//! `VaultSession` wraps the credential store and the cipher so the rest
//! of the application works with simple method calls like
//! `session.add("example.com", "alice", "hunter2")`.  It is an explicit
//! object owned by the caller — tests can run any number of independent
//! sessions in-process.
//!
//! State machine: `Locked -> Unlocked`.  A successful `initialize` or
//! `unlock` binds the cipher with the derived key; every entry operation
//! fails fast with `CipherNotBound` while locked.

use zeroize::Zeroizing;

use crate::crypto::cipher::SecretCipher;
use crate::crypto::kdf::{self, KdfParams};
use crate::crypto::verifier;
use crate::errors::{PasskeepError, Result};
use crate::store::db::{CredentialStore, SecretMetadata};

/// Whether the session currently holds an active key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Locked,
    Unlocked,
}

/// The main vault handle.  Create one with `VaultSession::new`, then
/// `initialize` (first run) or `unlock` before touching entries.
pub struct VaultSession {
    store: CredentialStore,
    cipher: SecretCipher,
    params: KdfParams,
    state: SessionState,
}

impl VaultSession {
    // ------------------------------------------------------------------
    // Construction and lifecycle
    // ------------------------------------------------------------------

    /// Build a locked session over an open store.
    pub fn new(store: CredentialStore, params: KdfParams) -> Self {
        Self {
            store,
            cipher: SecretCipher::new(),
            params,
            state: SessionState::Locked,
        }
    }

    /// Returns the current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns `true` once a master passphrase has been set.
    pub fn is_initialized(&self) -> Result<bool> {
        Ok(self.store.verifier()?.is_some())
    }

    /// First-run setup: persist the verifier, create the salt if absent,
    /// and unlock with the derived key.
    pub fn initialize(&mut self, passphrase: &str) -> Result<()> {
        if self.is_initialized()? {
            return Err(PasskeepError::InvalidInput(
                "vault is already initialized — use the passphrase-change flow instead".into(),
            ));
        }

        let phc = verifier::hash_passphrase(passphrase, &self.params)?;
        self.store.set_verifier(phc.as_bytes())?;

        let salt = self.ensure_salt()?;
        let key = kdf::derive_key(passphrase.as_bytes(), &salt, &self.params)?;
        self.cipher.bind(key);
        self.state = SessionState::Unlocked;

        Ok(())
    }

    /// Check an unlock attempt against the stored verifier without
    /// changing session state.
    ///
    /// Fails closed: no verifier, a malformed verifier, or a storage
    /// error all yield `false`.
    pub fn verify_passphrase(&self, attempt: &str) -> bool {
        match self.store.verifier() {
            Ok(Some(stored)) => verifier::verify_passphrase(attempt, &stored),
            Ok(None) | Err(_) => false,
        }
    }

    /// Authenticate and bind the cipher.
    ///
    /// Returns `NotInitialized` on a fresh store (expected on first run)
    /// and `AuthenticationFailed` on a wrong passphrase — the caller may
    /// retry indefinitely.
    pub fn unlock(&mut self, attempt: &str) -> Result<()> {
        let Some(stored) = self.store.verifier()? else {
            return Err(PasskeepError::NotInitialized);
        };

        if !verifier::verify_passphrase(attempt, &stored) {
            return Err(PasskeepError::AuthenticationFailed);
        }

        let salt = self.require_salt()?;
        let key = kdf::derive_key(attempt.as_bytes(), &salt, &self.params)?;
        self.cipher.bind(key);
        self.state = SessionState::Unlocked;

        Ok(())
    }

    /// Drop the active key and return to `Locked`.
    pub fn lock(&mut self) {
        self.cipher.unbind();
        self.state = SessionState::Locked;
    }

    // ------------------------------------------------------------------
    // Entry operations (require an unlocked session)
    // ------------------------------------------------------------------

    /// Encrypt and store a new entry.  Returns its assigned id.
    pub fn add(&mut self, website: &str, username: &str, plaintext: &str) -> Result<i64> {
        self.ensure_unlocked()?;
        validate_field(website, "website")?;
        validate_field(username, "username")?;

        let token = self.cipher.encrypt(plaintext)?;
        self.store.insert(website, username, &token)
    }

    /// Decrypt and return one entry's password.
    ///
    /// A `DecryptionFailed` here affects only this entry; other entries
    /// remain readable.
    pub fn reveal(&self, id: i64) -> Result<String> {
        self.ensure_unlocked()?;

        let token = self
            .store
            .ciphertext(id)?
            .ok_or(PasskeepError::RecordNotFound(id))?;

        self.cipher.decrypt(&token)
    }

    /// Replace an entry's username and/or password.  At least one field
    /// must be provided.
    pub fn update(
        &mut self,
        id: i64,
        username: Option<&str>,
        plaintext: Option<&str>,
    ) -> Result<()> {
        self.ensure_unlocked()?;

        if username.is_none() && plaintext.is_none() {
            return Err(PasskeepError::InvalidInput(
                "nothing to update — provide a new username, a new password, or both".into(),
            ));
        }
        if let Some(u) = username {
            validate_field(u, "username")?;
        }

        let token = match plaintext {
            Some(pt) => Some(self.cipher.encrypt(pt)?),
            None => None,
        };

        self.store.update(id, username, token.as_deref())
    }

    /// Delete an entry.  Returns whether it existed.
    pub fn delete(&mut self, id: i64) -> Result<bool> {
        self.ensure_unlocked()?;
        self.store.delete(id)
    }

    /// List all entries, newest first.
    pub fn entries(&self) -> Result<Vec<SecretMetadata>> {
        self.ensure_unlocked()?;
        self.store.list_metadata()
    }

    // ------------------------------------------------------------------
    // Re-keying
    // ------------------------------------------------------------------

    /// Change the master passphrase, re-encrypting every stored entry
    /// under the new key.  Returns the number of entries re-encrypted.
    ///
    /// All-or-nothing: every ciphertext is decrypted under the current
    /// key before anything is written, and the new verifier plus all
    /// re-encrypted tokens are committed in a single store transaction.
    /// If any entry cannot be decrypted, the operation aborts with
    /// `RekeyAborted` and the vault is untouched.
    pub fn change_passphrase(&mut self, new_passphrase: &str) -> Result<usize> {
        self.ensure_unlocked()?;

        // 1. Recover every plaintext under the current key.
        let records = self.store.all_ciphertexts()?;
        let mut plaintexts: Vec<(i64, Zeroizing<String>)> = Vec::with_capacity(records.len());
        for (id, token) in &records {
            match self.cipher.decrypt(token) {
                Ok(pt) => plaintexts.push((*id, Zeroizing::new(pt))),
                Err(_) => return Err(PasskeepError::RekeyAborted { id: *id }),
            }
        }

        // 2. Ordinary passphrase-creation flow: new verifier, new key
        //    from the unchanged salt.
        let phc = verifier::hash_passphrase(new_passphrase, &self.params)?;
        let salt = self.require_salt()?;
        let new_key = kdf::derive_key(new_passphrase.as_bytes(), &salt, &self.params)?;

        let mut fresh = SecretCipher::new();
        fresh.bind(new_key);

        // 3. Re-encrypt everything before touching the store.
        let mut reencrypted = Vec::with_capacity(plaintexts.len());
        for (id, pt) in &plaintexts {
            reencrypted.push((*id, fresh.encrypt(pt.as_str())?));
        }

        // 4. Verifier and all tokens land together, or not at all.
        self.store.commit_rekey(phc.as_bytes(), &reencrypted)?;

        // Only rebind after the commit succeeded; a failed commit leaves
        // both the store and the session on the old key.
        self.cipher = fresh;

        Ok(reencrypted.len())
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    fn ensure_unlocked(&self) -> Result<()> {
        if self.state == SessionState::Locked || !self.cipher.is_bound() {
            return Err(PasskeepError::CipherNotBound);
        }
        Ok(())
    }

    /// Return the stored salt, creating it on first initialization.
    fn ensure_salt(&self) -> Result<Vec<u8>> {
        if let Some(salt) = self.store.salt()? {
            return Ok(salt);
        }
        let salt = kdf::generate_salt();
        self.store.set_salt(&salt)?;
        Ok(salt.to_vec())
    }

    /// Return the stored salt; a missing salt after initialization is a
    /// setup error, not a user error.
    fn require_salt(&self) -> Result<Vec<u8>> {
        self.store.salt()?.ok_or_else(|| {
            PasskeepError::ConfigError(
                "no encryption salt in store — vault was never initialized".into(),
            )
        })
    }
}

/// Reject empty or whitespace-only user text before it reaches the store.
fn validate_field(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PasskeepError::InvalidInput(format!(
            "{field} cannot be empty"
        )));
    }
    Ok(())
}
