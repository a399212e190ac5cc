//! Cryptographic primitives for passkeep.
//!
//! This module provides:
//! - AES-256-GCM authenticated encryption of entry passwords (`cipher`)
//! - Argon2id key derivation from the master passphrase (`kdf`)
//! - Master-passphrase hashing and verification (`verifier`)

pub mod cipher;
pub mod kdf;
pub mod keys;
pub mod verifier;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{derive_key, SecretCipher, ...};
pub use cipher::SecretCipher;
pub use kdf::{derive_key, generate_salt, KdfParams};
pub use keys::EncryptionKey;
pub use verifier::{hash_passphrase, verify_passphrase};
