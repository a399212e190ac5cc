use thiserror::Error;

/// All errors that can occur in passkeep.
#[derive(Debug, Error)]
pub enum PasskeepError {
    // --- Vault lifecycle errors ---
    #[error("Vault is not initialized — no master passphrase has been set yet")]
    NotInitialized,

    #[error("Authentication failed — incorrect master passphrase")]
    AuthenticationFailed,

    // --- Crypto errors ---
    #[error("No encryption key is bound — unlock the vault first")]
    CipherNotBound,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — entry cannot be read under the current key")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Passphrase change aborted, vault unchanged — entry {id} could not be decrypted")]
    RekeyAborted { id: i64 },

    // --- Store errors ---
    #[error("No entry with id {0}")]
    RecordNotFound(i64),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    // --- Input / config errors ---
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- CLI / OS glue errors ---
    #[error("Clipboard error: {0}")]
    ClipboardError(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for PasskeepError {
    fn from(e: rusqlite::Error) -> Self {
        Self::StorageUnavailable(e.to_string())
    }
}

/// Convenience type alias for passkeep results.
pub type Result<T> = std::result::Result<T, PasskeepError>;
