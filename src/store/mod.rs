//! Store module — durable credential storage.
//!
//! This module provides:
//! - SQLite-backed `CredentialStore` for salt, verifier, and entries (`db`)
//! - Platform data-directory and database-path resolution (`paths`)

pub mod db;
pub mod paths;

// Re-export the most commonly used items.
pub use db::{CredentialStore, SecretMetadata};
