//! Password hashing with PBKDF2-HMAC-SHA512.
//!
//! Every call to `hash_password` draws a fresh random salt from the OS,
//! so hashing the same password twice never yields the same token.
//! The work factor is carried inside the token, which lets
//! `verify_password` check old tokens even after the defaults change.

use log::debug;
use rand::TryRngCore;
use sha2::Sha512;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::token::HashToken;
use crate::errors::{MqttCredError, Result};

/// Length of the derived key in bytes (the SHA-512 output size).
pub const KEY_LEN: usize = 64;

/// Lowest round count accepted for new hashes.
pub const MIN_ROUNDS: u32 = 100_000;

/// Shortest salt accepted for new hashes, in bytes.
pub const MIN_SALT_LEN: usize = 16;

/// PBKDF2 parameters used when producing new tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pbkdf2Params {
    /// Number of HMAC-SHA512 iterations (default: 100 000).
    pub rounds: u32,
    /// Salt length in bytes (default: 16).
    pub salt_len: usize,
}

impl Default for Pbkdf2Params {
    fn default() -> Self {
        Self {
            rounds: MIN_ROUNDS,
            salt_len: MIN_SALT_LEN,
        }
    }
}

impl Pbkdf2Params {
    /// Reject parameters weaker than the documented minimum.
    pub fn validate(&self) -> Result<()> {
        if self.rounds < MIN_ROUNDS {
            return Err(MqttCredError::HashingFailed(format!(
                "PBKDF2 rounds must be at least {MIN_ROUNDS} (got {})",
                self.rounds
            )));
        }
        if self.salt_len < MIN_SALT_LEN {
            return Err(MqttCredError::HashingFailed(format!(
                "salt must be at least {MIN_SALT_LEN} bytes (got {})",
                self.salt_len
            )));
        }
        Ok(())
    }
}

/// Hash a password with the default parameters.
pub fn hash_password(password: &str) -> Result<HashToken> {
    hash_password_with_params(password, &Pbkdf2Params::default())
}

/// Hash a password with explicit parameters.
pub fn hash_password_with_params(password: &str, params: &Pbkdf2Params) -> Result<HashToken> {
    params.validate()?;

    let salt = generate_salt(params.salt_len)?;
    let mut checksum = vec![0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha512>(password.as_bytes(), &salt, params.rounds, &mut checksum);

    debug!(
        "derived PBKDF2-SHA512 hash ({} rounds, {}-byte salt)",
        params.rounds, params.salt_len
    );

    Ok(HashToken::new(params.rounds, salt, checksum))
}

/// Check a password against a token.
///
/// Re-derives the key with the token's own rounds and salt and compares
/// in constant time.
pub fn verify_password(password: &str, token: &HashToken) -> bool {
    let mut derived = Zeroizing::new(vec![0u8; token.checksum().len()]);
    pbkdf2::pbkdf2_hmac::<Sha512>(
        password.as_bytes(),
        token.salt(),
        token.rounds(),
        &mut derived,
    );

    derived.as_slice().ct_eq(token.checksum()).into()
}

/// Generate `len` cryptographically random salt bytes.
pub fn generate_salt(len: usize) -> Result<Vec<u8>> {
    let mut salt = vec![0u8; len];
    rand::rngs::OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| MqttCredError::HashingFailed(format!("system RNG unavailable: {e}")))?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_answer_vector() {
        // PBKDF2-HMAC-SHA512("password", "salt", 1 round, 64 bytes).
        let mut out = [0u8; KEY_LEN];
        pbkdf2::pbkdf2_hmac::<Sha512>(b"password", b"salt", 1, &mut out);
        assert_eq!(out[..4], [0x86u8, 0x7f, 0x70, 0xcf]);
        assert_eq!(out[60..], [0x60u8, 0xa5, 0x7f, 0xce]);
    }

    #[test]
    fn default_params_meet_minimums() {
        let params = Pbkdf2Params::default();
        assert_eq!(params.rounds, 100_000);
        assert_eq!(params.salt_len, 16);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn weak_params_are_rejected() {
        let few_rounds = Pbkdf2Params {
            rounds: 1_000,
            ..Pbkdf2Params::default()
        };
        assert!(hash_password_with_params("Passw0rd", &few_rounds).is_err());

        let short_salt = Pbkdf2Params {
            salt_len: 8,
            ..Pbkdf2Params::default()
        };
        assert!(hash_password_with_params("Passw0rd", &short_salt).is_err());
    }

    #[test]
    fn token_embeds_parameters() {
        let token = hash_password("Passw0rd").unwrap();
        assert_eq!(token.rounds(), 100_000);
        assert_eq!(token.salt().len(), 16);
        assert_eq!(token.checksum().len(), KEY_LEN);
        assert!(token.to_string().starts_with("$pbkdf2-sha512$100000$"));
    }

    #[test]
    fn verify_accepts_right_and_rejects_wrong_password() {
        let token = hash_password("Passw0rd").unwrap();
        assert!(verify_password("Passw0rd", &token));
        assert!(!verify_password("Passw0rd!", &token));
        assert!(!verify_password("", &token));
    }

    #[test]
    fn generate_salt_has_requested_length() {
        assert_eq!(generate_salt(16).unwrap().len(), 16);
        assert_eq!(generate_salt(32).unwrap().len(), 32);
    }
}
