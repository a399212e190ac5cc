//! AES-256-GCM authenticated encryption of entry passwords.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! prepends it to the ciphertext, then base64-encodes the whole buffer
//! into a self-contained text token:
//!
//! ```text
//! base64( [ 12-byte nonce | ciphertext + 16-byte auth tag ] )
//! ```
//!
//! `decrypt` splits the nonce back out before decrypting, so a token is
//! all a caller needs to store.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use zeroize::Zeroize;

use crate::crypto::keys::EncryptionKey;
use crate::errors::{PasskeepError, Result};

/// Size of the AES-256-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// A session-scoped cipher bound to at most one vault key at a time.
///
/// `bind` must be called before any encrypt/decrypt call; every
/// operation on an unbound cipher fails with `CipherNotBound`.
#[derive(Default)]
pub struct SecretCipher {
    key: Option<EncryptionKey>,
}

impl SecretCipher {
    /// Create an unbound cipher.
    pub fn new() -> Self {
        Self { key: None }
    }

    /// Activate the cipher with a derived vault key.
    ///
    /// Rebinding replaces the previous key in a single assignment, so
    /// every subsequent call sees the new key consistently.
    pub fn bind(&mut self, key: EncryptionKey) {
        self.key = Some(key);
    }

    /// Drop the active key (on lock/exit).  Zeroization happens in the
    /// key's own drop.
    pub fn unbind(&mut self) {
        self.key = None;
    }

    /// Returns `true` if a key is currently bound.
    pub fn is_bound(&self) -> bool {
        self.key.is_some()
    }

    fn key(&self) -> Result<&EncryptionKey> {
        self.key.as_ref().ok_or(PasskeepError::CipherNotBound)
    }

    /// Encrypt a plaintext password into a self-contained token.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let key = self.key()?;

        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| PasskeepError::EncryptionFailed(format!("invalid key length: {e}")))?;

        // Fresh random nonce for every token.
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| PasskeepError::EncryptionFailed(format!("encryption error: {e}")))?;

        let mut raw = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(raw))
    }

    /// Decrypt a token produced by `encrypt`.
    ///
    /// Any malformed, truncated, tampered, or wrong-key token fails with
    /// `DecryptionFailed`.  Callers must treat that as "not recoverable
    /// under the current key" — rebinding the correct key recovers the
    /// entry.
    pub fn decrypt(&self, token: &str) -> Result<String> {
        let key = self.key()?;

        let raw = BASE64
            .decode(token)
            .map_err(|_| PasskeepError::DecryptionFailed)?;

        // Make sure we have at least a nonce worth of bytes.
        if raw.len() < NONCE_LEN {
            return Err(PasskeepError::DecryptionFailed);
        }

        let (nonce_bytes, ciphertext) = raw.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|_| PasskeepError::DecryptionFailed)?;

        // Decrypt and verify the auth tag in one pass.
        let plaintext = cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| PasskeepError::DecryptionFailed)?;

        // On error, zeroize the bytes inside the error before discarding.
        String::from_utf8(plaintext).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            PasskeepError::DecryptionFailed
        })
    }
}
