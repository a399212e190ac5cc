//! Master-passphrase hashing and verification.
//!
//! The verifier is an Argon2id PHC string: each call to `hash_passphrase`
//! generates a fresh random salt, and both the salt and the cost
//! parameters are embedded in the string itself.  Verification therefore
//! keeps working even after the configured costs change.
//!
//! The verifier gates login only — it is never used for key derivation,
//! which has its own persistent salt (see `kdf`).

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::crypto::kdf::{self, KdfParams};
use crate::errors::{PasskeepError, Result};

/// Hash a master passphrase into a PHC-format verifier string.
pub fn hash_passphrase(passphrase: &str, params: &KdfParams) -> Result<String> {
    let argon2 = kdf::instance(params)?;
    let salt = SaltString::generate(&mut OsRng);

    let hash = argon2
        .hash_password(passphrase.as_bytes(), &salt)
        .map_err(|e| PasskeepError::KeyDerivationFailed(format!("passphrase hashing failed: {e}")))?;

    Ok(hash.to_string())
}

/// Check an unlock attempt against a stored verifier.
///
/// Fails closed: a missing, non-UTF-8, or malformed verifier all yield
/// `false`, as does a plain mismatch.  Nothing propagates past this
/// boundary.  Verification uses the cost parameters embedded in the
/// stored string, not the currently configured ones.
pub fn verify_passphrase(attempt: &str, stored: &[u8]) -> bool {
    let Ok(stored_str) = std::str::from_utf8(stored) else {
        return false;
    };
    let Ok(parsed) = PasswordHash::new(stored_str) else {
        return false;
    };

    Argon2::default()
        .verify_password(attempt.as_bytes(), &parsed)
        .is_ok()
}
