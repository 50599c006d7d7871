//! Integration tests for the password hasher and token format.

use mqttcred::crypto::{hash_password, verify_password, HashToken};

/// Generated independently with PBKDF2-HMAC-SHA512("Passw0rd",
/// salt = b"0123456789abcdef", 1000 rounds), in passlib's token layout.
const REFERENCE_TOKEN: &str = "$pbkdf2-sha512$1000$MDEyMzQ1Njc4OWFiY2RlZg$gHHA9/nLcZXjEg86KM0NLfhWQKuWbbS9.y9XTzqxhzYfOxS5qVlYF1SiH6NKMC1.TBUmlR/L.4zmsahEJ3.9lQ";

#[test]
fn same_password_hashes_to_different_tokens() {
    let a = hash_password("Passw0rd").expect("hash 1");
    let b = hash_password("Passw0rd").expect("hash 2");

    assert_ne!(a.to_string(), b.to_string(), "salts must differ per call");
    assert_ne!(a.salt(), b.salt());

    // Both are valid representations of the same plaintext.
    assert!(verify_password("Passw0rd", &a));
    assert!(verify_password("Passw0rd", &b));
}

#[test]
fn token_survives_text_roundtrip() {
    let token = hash_password("Passw0rd").unwrap();
    let reparsed = HashToken::parse(&token.to_string()).unwrap();
    assert_eq!(reparsed, token);
    assert!(verify_password("Passw0rd", &reparsed));
}

#[test]
fn verifies_externally_generated_token() {
    let token = HashToken::parse(REFERENCE_TOKEN).unwrap();
    assert_eq!(token.rounds(), 1000);
    assert_eq!(token.salt(), b"0123456789abcdef");
    assert_eq!(token.checksum().len(), 64);

    assert!(verify_password("Passw0rd", &token));
    assert!(!verify_password("Passw0rd1", &token));
}

#[test]
fn tampered_checksum_fails_verification() {
    let tampered = REFERENCE_TOKEN.replacen("gHHA", "gHHB", 1);
    let token = HashToken::parse(&tampered).unwrap();
    assert!(!verify_password("Passw0rd", &token));
}

#[test]
fn token_never_contains_record_separator() {
    for _ in 0..8 {
        let text = hash_password("Passw0rd").unwrap().to_string();
        assert!(!text.contains(':'));
        assert!(!text.contains(char::is_whitespace));
    }
}
