//! Random password generation and complexity checking.

use rand::Rng;

/// Characters drawn on for generated passwords: letters, digits, and
/// ASCII punctuation.
const CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789\
      !\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Generate a random password of the given length.
pub fn generate_password(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// Check a password against the complexity rules.
///
/// Returns the list of unmet requirements; an empty list means the
/// password is acceptable.
pub fn complexity_gaps(password: &str, min_length: usize) -> Vec<String> {
    let mut gaps = Vec::new();

    if password.chars().count() < min_length {
        gaps.push(format!("at least {min_length} characters"));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        gaps.push("an uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        gaps.push("a lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        gaps.push("a digit".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_punctuation()) {
        gaps.push("a punctuation symbol".to_string());
    }

    gaps
}
