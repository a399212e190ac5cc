//! Integration tests for the passkeep crypto module.

use passkeep::crypto::{
    derive_key, generate_salt, hash_passphrase, verify_passphrase, KdfParams, SecretCipher,
};
use passkeep::errors::PasskeepError;

/// Low-cost Argon2 params so the suite stays fast.
fn fast_params() -> KdfParams {
    KdfParams {
        memory_kib: 8_192,
        iterations: 1,
        parallelism: 1,
    }
}

// ---------------------------------------------------------------------------
// Passphrase verifier
// ---------------------------------------------------------------------------

#[test]
fn hash_then_verify_roundtrip() {
    let phc = hash_passphrase("Secr3t!@", &fast_params()).expect("hash");

    assert!(verify_passphrase("Secr3t!@", phc.as_bytes()));
    assert!(!verify_passphrase("Secr3t!#", phc.as_bytes()));
    assert!(!verify_passphrase("", phc.as_bytes()));
}

#[test]
fn verify_fails_closed_on_malformed_verifier() {
    assert!(!verify_passphrase("anything", b""));
    assert!(!verify_passphrase("anything", b"not-a-phc-string"));
    // Invalid UTF-8 must not panic either.
    assert!(!verify_passphrase("anything", &[0xff, 0xfe, 0xfd]));
}

#[test]
fn each_hash_embeds_a_fresh_salt() {
    let params = fast_params();
    let a = hash_passphrase("same-passphrase", &params).unwrap();
    let b = hash_passphrase("same-passphrase", &params).unwrap();

    // Per-call random salt means the strings differ...
    assert_ne!(a, b);
    // ...but both still verify.
    assert!(verify_passphrase("same-passphrase", a.as_bytes()));
    assert!(verify_passphrase("same-passphrase", b.as_bytes()));
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

#[test]
fn derive_key_is_deterministic() {
    let params = fast_params();
    let salt = generate_salt();

    let k1 = derive_key(b"my-passphrase", &salt, &params).unwrap();
    let k2 = derive_key(b"my-passphrase", &salt, &params).unwrap();

    assert_eq!(k1.as_bytes(), k2.as_bytes());
}

#[test]
fn different_salt_or_passphrase_changes_the_key() {
    let params = fast_params();
    let salt_a = [1u8; 16];
    let salt_b = [2u8; 16];

    let base = derive_key(b"my-passphrase", &salt_a, &params).unwrap();
    let other_salt = derive_key(b"my-passphrase", &salt_b, &params).unwrap();
    let other_pass = derive_key(b"my-passphras3", &salt_a, &params).unwrap();

    assert_ne!(base.as_bytes(), other_salt.as_bytes());
    assert_ne!(base.as_bytes(), other_pass.as_bytes());
}

#[test]
fn rejects_dangerously_low_memory_cost() {
    let params = KdfParams {
        memory_kib: 1_024,
        iterations: 1,
        parallelism: 1,
    };
    let result = derive_key(b"pw", &[0u8; 16], &params);
    assert!(matches!(
        result,
        Err(PasskeepError::KeyDerivationFailed(_))
    ));
}

// ---------------------------------------------------------------------------
// Cipher round-trip
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip_under_derived_key() {
    let params = fast_params();
    let salt = generate_salt();

    let key = derive_key(b"Secr3t!@", &salt, &params).unwrap();
    let mut cipher = SecretCipher::new();
    cipher.bind(key);

    let token = cipher.encrypt("hunter2").expect("encrypt");
    assert_eq!(cipher.decrypt(&token).expect("decrypt"), "hunter2");
}

#[test]
fn encrypt_produces_different_tokens_each_time() {
    let key = derive_key(b"pw", &[3u8; 16], &fast_params()).unwrap();
    let mut cipher = SecretCipher::new();
    cipher.bind(key);

    let t1 = cipher.encrypt("same plaintext").unwrap();
    let t2 = cipher.encrypt("same plaintext").unwrap();

    // Fresh random nonce per call.
    assert_ne!(t1, t2);
}

#[test]
fn decrypt_under_wrong_key_fails() {
    let params = fast_params();
    let salt = generate_salt();

    let mut cipher = SecretCipher::new();
    cipher.bind(derive_key(b"first-passphrase", &salt, &params).unwrap());
    let token = cipher.encrypt("top secret").unwrap();

    cipher.bind(derive_key(b"second-passphrase", &salt, &params).unwrap());
    let result = cipher.decrypt(&token);

    assert!(matches!(result, Err(PasskeepError::DecryptionFailed)));
}

#[test]
fn tampered_token_fails_authentication() {
    let key = derive_key(b"pw", &[4u8; 16], &fast_params()).unwrap();
    let mut cipher = SecretCipher::new();
    cipher.bind(key);

    let token = cipher.encrypt("payload").unwrap();

    // Flip one character somewhere past the nonce prefix.
    let mut bytes: Vec<char> = token.chars().collect();
    let idx = bytes.len() / 2;
    bytes[idx] = if bytes[idx] == 'A' { 'B' } else { 'A' };
    let tampered: String = bytes.into_iter().collect();

    assert!(matches!(
        cipher.decrypt(&tampered),
        Err(PasskeepError::DecryptionFailed)
    ));
}

#[test]
fn malformed_tokens_fail_cleanly() {
    let key = derive_key(b"pw", &[5u8; 16], &fast_params()).unwrap();
    let mut cipher = SecretCipher::new();
    cipher.bind(key);

    // Not base64 at all.
    assert!(matches!(
        cipher.decrypt("definitely not base64 !!!"),
        Err(PasskeepError::DecryptionFailed)
    ));

    // Valid base64 but shorter than a nonce.
    assert!(matches!(
        cipher.decrypt("AAAA"),
        Err(PasskeepError::DecryptionFailed)
    ));
}

// ---------------------------------------------------------------------------
// Bind lifecycle
// ---------------------------------------------------------------------------

#[test]
fn unbound_cipher_rejects_all_operations() {
    let cipher = SecretCipher::new();

    assert!(matches!(
        cipher.encrypt("x"),
        Err(PasskeepError::CipherNotBound)
    ));
    assert!(matches!(
        cipher.decrypt("x"),
        Err(PasskeepError::CipherNotBound)
    ));
}

#[test]
fn unbind_drops_the_active_key() {
    let key = derive_key(b"pw", &[6u8; 16], &fast_params()).unwrap();
    let mut cipher = SecretCipher::new();
    cipher.bind(key);
    let token = cipher.encrypt("x").unwrap();

    cipher.unbind();
    assert!(!cipher.is_bound());
    assert!(matches!(
        cipher.decrypt(&token),
        Err(PasskeepError::CipherNotBound)
    ));
}
