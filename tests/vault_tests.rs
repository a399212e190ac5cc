//! Integration tests for the vault session and the re-keying protocol.

use std::path::Path;

use passkeep::crypto::{derive_key, KdfParams, SecretCipher};
use passkeep::errors::PasskeepError;
use passkeep::store::CredentialStore;
use passkeep::vault::{SessionState, VaultSession};
use tempfile::TempDir;

/// Low-cost Argon2 params so the suite stays fast.
fn fast_params() -> KdfParams {
    KdfParams {
        memory_kib: 8_192,
        iterations: 1,
        parallelism: 1,
    }
}

/// Helper: build a session over the vault database at `path`.
fn session_at(path: &Path) -> VaultSession {
    let store = CredentialStore::open(path).expect("open store");
    VaultSession::new(store, fast_params())
}

// ---------------------------------------------------------------------------
// Initialization and unlock
// ---------------------------------------------------------------------------

#[test]
fn initialize_unlocks_and_roundtrips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vault.db");

    let mut session = session_at(&path);
    assert!(!session.is_initialized().unwrap());
    assert_eq!(session.state(), SessionState::Locked);

    session.initialize("Secr3t!@").unwrap();
    assert!(session.is_initialized().unwrap());
    assert_eq!(session.state(), SessionState::Unlocked);

    let id = session.add("example.com", "alice", "hunter2").unwrap();
    assert_eq!(session.reveal(id).unwrap(), "hunter2");
}

#[test]
fn initialize_twice_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vault.db");

    let mut session = session_at(&path);
    session.initialize("first-passphrase").unwrap();

    let result = session.initialize("second-passphrase");
    assert!(matches!(result, Err(PasskeepError::InvalidInput(_))));
}

#[test]
fn unlock_rejects_wrong_passphrase() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vault.db");

    session_at(&path).initialize("right-passphrase").unwrap();

    let mut session = session_at(&path);
    let result = session.unlock("wrong-passphrase");
    assert!(matches!(result, Err(PasskeepError::AuthenticationFailed)));
    assert_eq!(session.state(), SessionState::Locked);

    // Retry with the right passphrase succeeds.
    session.unlock("right-passphrase").unwrap();
    assert_eq!(session.state(), SessionState::Unlocked);
}

#[test]
fn unlock_on_fresh_store_reports_not_initialized() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vault.db");

    let mut session = session_at(&path);
    let result = session.unlock("anything");
    assert!(matches!(result, Err(PasskeepError::NotInitialized)));

    // The boolean check fails closed instead of erroring.
    assert!(!session.verify_passphrase("anything"));
}

#[test]
fn unlock_recovers_entries_across_sessions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vault.db");

    let mut first = session_at(&path);
    first.initialize("shared-passphrase").unwrap();
    let id = first.add("example.com", "alice", "hunter2").unwrap();
    drop(first);

    let mut second = session_at(&path);
    second.unlock("shared-passphrase").unwrap();
    assert_eq!(second.reveal(id).unwrap(), "hunter2");
}

// ---------------------------------------------------------------------------
// Locked-state behavior
// ---------------------------------------------------------------------------

#[test]
fn locked_session_fails_fast() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vault.db");

    session_at(&path).initialize("a-passphrase").unwrap();

    let mut session = session_at(&path);
    assert!(matches!(
        session.add("site", "user", "pw"),
        Err(PasskeepError::CipherNotBound)
    ));
    assert!(matches!(
        session.reveal(1),
        Err(PasskeepError::CipherNotBound)
    ));
    assert!(matches!(
        session.entries(),
        Err(PasskeepError::CipherNotBound)
    ));
    assert!(matches!(
        session.update(1, Some("user"), None),
        Err(PasskeepError::CipherNotBound)
    ));
    assert!(matches!(
        session.delete(1),
        Err(PasskeepError::CipherNotBound)
    ));
}

#[test]
fn lock_drops_the_key_until_reunlock() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vault.db");

    let mut session = session_at(&path);
    session.initialize("a-passphrase").unwrap();
    let id = session.add("example.com", "alice", "hunter2").unwrap();

    session.lock();
    assert_eq!(session.state(), SessionState::Locked);
    assert!(matches!(
        session.reveal(id),
        Err(PasskeepError::CipherNotBound)
    ));

    session.unlock("a-passphrase").unwrap();
    assert_eq!(session.reveal(id).unwrap(), "hunter2");
}

// ---------------------------------------------------------------------------
// Entry operations
// ---------------------------------------------------------------------------

#[test]
fn add_rejects_empty_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vault.db");

    let mut session = session_at(&path);
    session.initialize("a-passphrase").unwrap();

    assert!(matches!(
        session.add("", "alice", "pw"),
        Err(PasskeepError::InvalidInput(_))
    ));
    assert!(matches!(
        session.add("example.com", "   ", "pw"),
        Err(PasskeepError::InvalidInput(_))
    ));
}

#[test]
fn update_username_keeps_stored_password() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vault.db");

    let mut session = session_at(&path);
    session.initialize("a-passphrase").unwrap();

    let id = session.add("example.com", "alice", "x").unwrap();
    assert_eq!(id, 1);

    session.update(id, Some("alice2"), None).unwrap();

    let entries = session.entries().unwrap();
    assert_eq!(entries[0].username, "alice2");
    assert_eq!(entries[0].website, "example.com");
    assert_eq!(session.reveal(id).unwrap(), "x");
}

#[test]
fn update_with_no_fields_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vault.db");

    let mut session = session_at(&path);
    session.initialize("a-passphrase").unwrap();
    let id = session.add("example.com", "alice", "x").unwrap();

    assert!(matches!(
        session.update(id, None, None),
        Err(PasskeepError::InvalidInput(_))
    ));
}

#[test]
fn reveal_unknown_id_reports_not_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vault.db");

    let mut session = session_at(&path);
    session.initialize("a-passphrase").unwrap();

    assert!(matches!(
        session.reveal(42),
        Err(PasskeepError::RecordNotFound(42))
    ));
}

#[test]
fn delete_through_session_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vault.db");

    let mut session = session_at(&path);
    session.initialize("a-passphrase").unwrap();
    let id = session.add("example.com", "alice", "x").unwrap();

    assert!(session.delete(id).unwrap());
    assert!(!session.delete(id).unwrap());
}

// ---------------------------------------------------------------------------
// Re-keying
// ---------------------------------------------------------------------------

#[test]
fn change_passphrase_reencrypts_every_entry() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vault.db");

    let mut session = session_at(&path);
    session.initialize("old-passphrase").unwrap();
    session.add("a.com", "a", "plain-a").unwrap();
    session.add("b.com", "b", "plain-b").unwrap();
    session.add("c.com", "c", "plain-c").unwrap();

    let count = session.change_passphrase("new-passphrase").unwrap();
    assert_eq!(count, 3);

    // The live session stays unlocked on the new key.
    assert_eq!(session.reveal(1).unwrap(), "plain-a");
    assert_eq!(session.reveal(2).unwrap(), "plain-b");
    assert_eq!(session.reveal(3).unwrap(), "plain-c");

    // The old passphrase no longer authenticates...
    let mut stale = session_at(&path);
    assert!(matches!(
        stale.unlock("old-passphrase"),
        Err(PasskeepError::AuthenticationFailed)
    ));

    // ...and the old key no longer decrypts any stored token.
    let raw = CredentialStore::open(&path).unwrap();
    let salt = raw.salt().unwrap().expect("salt exists");
    let old_key = derive_key(b"old-passphrase", &salt, &fast_params()).unwrap();
    let mut old_cipher = SecretCipher::new();
    old_cipher.bind(old_key);
    let token = raw.ciphertext(1).unwrap().unwrap();
    assert!(matches!(
        old_cipher.decrypt(&token),
        Err(PasskeepError::DecryptionFailed)
    ));

    // A fresh session under the new passphrase recovers everything.
    let mut fresh = session_at(&path);
    fresh.unlock("new-passphrase").unwrap();
    assert_eq!(fresh.reveal(1).unwrap(), "plain-a");
    assert_eq!(fresh.reveal(2).unwrap(), "plain-b");
    assert_eq!(fresh.reveal(3).unwrap(), "plain-c");
}

#[test]
fn rekey_aborts_untouched_when_any_entry_is_unreadable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vault.db");

    let mut session = session_at(&path);
    session.initialize("old-passphrase").unwrap();
    session.add("a.com", "a", "plain-a").unwrap();
    session.add("b.com", "b", "plain-b").unwrap();
    session.add("c.com", "c", "plain-c").unwrap();

    // Corrupt the middle entry behind the session's back.
    let raw = CredentialStore::open(&path).unwrap();
    raw.update(2, None, Some("garbage-token")).unwrap();
    let before = raw.all_ciphertexts().unwrap();
    let verifier_before = raw.verifier().unwrap();

    let result = session.change_passphrase("new-passphrase");
    assert!(matches!(result, Err(PasskeepError::RekeyAborted { id: 2 })));

    // All-or-nothing: no ciphertext and no verifier changed.
    assert_eq!(raw.all_ciphertexts().unwrap(), before);
    assert_eq!(raw.verifier().unwrap(), verifier_before);

    // The old passphrase still works, and intact entries still decrypt.
    let mut retry = session_at(&path);
    retry.unlock("old-passphrase").unwrap();
    assert_eq!(retry.reveal(1).unwrap(), "plain-a");
    assert_eq!(retry.reveal(3).unwrap(), "plain-c");
}

#[test]
fn rekey_of_empty_vault_succeeds() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vault.db");

    let mut session = session_at(&path);
    session.initialize("old-passphrase").unwrap();

    assert_eq!(session.change_passphrase("new-passphrase").unwrap(), 0);

    let mut fresh = session_at(&path);
    fresh.unlock("new-passphrase").unwrap();
}

#[test]
fn rekey_requires_an_unlocked_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vault.db");

    session_at(&path).initialize("a-passphrase").unwrap();

    let mut locked = session_at(&path);
    assert!(matches!(
        locked.change_passphrase("other"),
        Err(PasskeepError::CipherNotBound)
    ));
}

// ---------------------------------------------------------------------------
// Session independence
// ---------------------------------------------------------------------------

#[test]
fn independent_sessions_do_not_share_state() {
    let dir_a = TempDir::new().unwrap();
    let dir_b = TempDir::new().unwrap();

    let mut a = session_at(&dir_a.path().join("vault.db"));
    let mut b = session_at(&dir_b.path().join("vault.db"));

    a.initialize("passphrase-a").unwrap();
    b.initialize("passphrase-b").unwrap();

    let id_a = a.add("a.com", "alice", "secret-a").unwrap();
    let id_b = b.add("b.com", "bob", "secret-b").unwrap();

    assert_eq!(a.reveal(id_a).unwrap(), "secret-a");
    assert_eq!(b.reveal(id_b).unwrap(), "secret-b");
    assert_eq!(a.entries().unwrap().len(), 1);
    assert_eq!(b.entries().unwrap().len(), 1);
}
