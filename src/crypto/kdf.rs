//! Passphrase-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects against brute-force and
//! GPU-based attacks.  Parameters are configurable via `KdfParams`
//! (loaded from `config.toml` or sensible defaults).

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

use crate::crypto::keys::EncryptionKey;
use crate::errors::{PasskeepError, Result};

/// Length of the key-derivation salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Configurable Argon2id cost parameters.
///
/// These map 1:1 to the fields in `Settings` so the CLI can pass
/// whatever the user configured in `config.toml`.
#[derive(Debug, Clone, Copy)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// Build an Argon2id instance from cost parameters.
///
/// Enforces minimum costs so a mistyped config file cannot silently
/// weaken key derivation.
pub(crate) fn instance(params: &KdfParams) -> Result<Argon2<'static>> {
    if params.memory_kib < MIN_MEMORY_KIB {
        return Err(PasskeepError::KeyDerivationFailed(format!(
            "memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
            params.memory_kib
        )));
    }
    if params.iterations < 1 {
        return Err(PasskeepError::KeyDerivationFailed(
            "iterations must be at least 1".into(),
        ));
    }
    if params.parallelism < 1 {
        return Err(PasskeepError::KeyDerivationFailed(
            "parallelism must be at least 1".into(),
        ));
    }

    let params = Params::new(
        params.memory_kib,
        params.iterations,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| PasskeepError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Derive the 32-byte vault encryption key from a passphrase and salt.
///
/// The same passphrase + salt + params always produce the same key —
/// this determinism is what makes previously stored entries decryptable
/// across sessions.
pub fn derive_key(passphrase: &[u8], salt: &[u8], params: &KdfParams) -> Result<EncryptionKey> {
    let argon2 = instance(params)?;

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(passphrase, salt, &mut key)
        .map_err(|e| {
            PasskeepError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}"))
        })?;

    Ok(EncryptionKey::new(key))
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
