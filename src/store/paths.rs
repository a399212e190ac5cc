//! Platform data-directory and database-path resolution.
//!
//! The vault database lives under the OS-appropriate data directory
//! (`~/.local/share/passkeep` on Linux, `~/Library/Application Support`
//! on macOS, `%APPDATA%` on Windows).  If that directory cannot be
//! created or written to, we fall back to the current directory, and
//! `PASSKEEP_DB` overrides everything for scripted or test use.

use std::fs;
use std::path::{Path, PathBuf};

/// Application directory name under the platform data dir.
pub const APP_DIR: &str = "passkeep";

/// Vault database filename.
pub const DB_FILENAME: &str = "passkeep.db";

/// Resolve the directory for the vault database and config file.
pub fn data_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(base) => {
            let dir = base.join(APP_DIR);
            if ensure_writable_dir(&dir) {
                dir
            } else {
                PathBuf::from(".")
            }
        }
        None => PathBuf::from("."),
    }
}

/// Resolve the full path to the vault database.
///
/// `PASSKEEP_DB` takes precedence when set and non-empty.
pub fn database_path() -> PathBuf {
    if let Ok(p) = std::env::var("PASSKEEP_DB") {
        if !p.is_empty() {
            return PathBuf::from(p);
        }
    }

    data_dir().join(DB_FILENAME)
}

/// Create `dir` if needed and probe it with a throwaway write.
fn ensure_writable_dir(dir: &Path) -> bool {
    if fs::create_dir_all(dir).is_err() {
        return false;
    }

    let probe = dir.join(".write_test");
    match fs::write(&probe, b"probe") {
        Ok(()) => {
            let _ = fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}
