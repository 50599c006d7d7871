//! Self-describing hash token in modular-crypt format.
//!
//! ```text
//! $pbkdf2-sha512$<rounds>$<salt>$<checksum>
//! ```
//!
//! This is the layout passlib emits for `pbkdf2_sha512`, which MQTT
//! broker auth plugins already understand.  Salt and checksum use the
//! "adapted base64" alphabet: standard base64, no padding, with `.` in
//! place of `+`.  None of these characters is `:`, so a token is always
//! safe to store after the record separator.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD_NO_PAD as BASE64;
use base64::Engine;

use crate::errors::{MqttCredError, Result};

/// Scheme identifier embedded in every token.
pub const SCHEME: &str = "pbkdf2-sha512";

/// A parsed PBKDF2-SHA512 hash token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashToken {
    rounds: u32,
    salt: Vec<u8>,
    checksum: Vec<u8>,
}

impl HashToken {
    pub fn new(rounds: u32, salt: Vec<u8>, checksum: Vec<u8>) -> Self {
        Self {
            rounds,
            salt,
            checksum,
        }
    }

    /// Parse a token string such as `$pbkdf2-sha512$100000$...$...`.
    pub fn parse(token: &str) -> Result<Self> {
        let rest = token
            .strip_prefix('$')
            .ok_or_else(|| MqttCredError::MalformedToken("missing leading '$'".into()))?;

        let parts: Vec<&str> = rest.split('$').collect();
        if parts.len() != 4 {
            return Err(MqttCredError::MalformedToken(format!(
                "expected 4 '$'-separated fields, found {}",
                parts.len()
            )));
        }

        if parts[0] != SCHEME {
            return Err(MqttCredError::MalformedToken(format!(
                "unsupported scheme '{}', expected '{SCHEME}'",
                parts[0]
            )));
        }

        let rounds: u32 = parts[1].parse().map_err(|_| {
            MqttCredError::MalformedToken(format!("invalid round count '{}'", parts[1]))
        })?;
        if rounds == 0 {
            return Err(MqttCredError::MalformedToken(
                "round count must be positive".into(),
            ));
        }

        let salt = ab64_decode(parts[2])
            .map_err(|e| MqttCredError::MalformedToken(format!("salt: {e}")))?;
        let checksum = ab64_decode(parts[3])
            .map_err(|e| MqttCredError::MalformedToken(format!("checksum: {e}")))?;

        if salt.is_empty() || checksum.is_empty() {
            return Err(MqttCredError::MalformedToken(
                "salt and checksum must not be empty".into(),
            ));
        }

        Ok(Self {
            rounds,
            salt,
            checksum,
        })
    }

    /// Iteration count used to derive the checksum.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// The derived key bytes.
    pub fn checksum(&self) -> &[u8] {
        &self.checksum
    }
}

impl fmt::Display for HashToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${SCHEME}${}${}${}",
            self.rounds,
            ab64_encode(&self.salt),
            ab64_encode(&self.checksum)
        )
    }
}

impl FromStr for HashToken {
    type Err = MqttCredError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn ab64_encode(data: &[u8]) -> String {
    BASE64.encode(data).replace('+', ".")
}

fn ab64_decode(data: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    BASE64.decode(data.replace('.', "+"))
}
