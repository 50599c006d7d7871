//! A single `username:passwordHash` record.

use crate::errors::{MqttCredError, Result};

/// Field separator between username and hash token.
pub const SEPARATOR: char = ':';

/// One credential line in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub username: String,
    pub password_hash: String,
}

impl CredentialRecord {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }

    /// Parse one line (without its line terminator).
    ///
    /// `line_no` is 1-based and only used for error reporting.  The split
    /// happens at the first `:`, so the hash may itself contain colons.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Self> {
        let (username, password_hash) = line.split_once(SEPARATOR).ok_or_else(|| {
            MqttCredError::MalformedRecord {
                line: line_no,
                reason: format!("missing '{SEPARATOR}' separator"),
            }
        })?;

        if username.is_empty() {
            return Err(MqttCredError::MalformedRecord {
                line: line_no,
                reason: "empty username".into(),
            });
        }
        if password_hash.is_empty() {
            return Err(MqttCredError::MalformedRecord {
                line: line_no,
                reason: format!("empty password hash for '{username}'"),
            });
        }

        Ok(Self::new(username, password_hash))
    }

    /// Serialize as `username:hash\n`.
    pub fn to_line(&self) -> String {
        format!("{}{SEPARATOR}{}\n", self.username, self.password_hash)
    }
}

/// Validate that a username can be stored without breaking the format.
///
/// Must be non-empty and free of the separator and line breaks.
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(MqttCredError::InvalidUsername(
            "username cannot be empty".into(),
        ));
    }
    if username.contains(SEPARATOR) {
        return Err(MqttCredError::InvalidUsername(format!(
            "'{username}' contains the '{SEPARATOR}' separator"
        )));
    }
    if username.contains(|c: char| c == '\n' || c == '\r') {
        return Err(MqttCredError::InvalidUsername(
            "username cannot contain line breaks".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_at_first_separator() {
        let rec = CredentialRecord::parse_line("alice:$pbkdf2-sha512$1$a:b$c", 1).unwrap();
        assert_eq!(rec.username, "alice");
        assert_eq!(rec.password_hash, "$pbkdf2-sha512$1$a:b$c");
    }

    #[test]
    fn parse_rejects_missing_separator() {
        let err = CredentialRecord::parse_line("alice", 3).unwrap_err();
        assert!(matches!(err, MqttCredError::MalformedRecord { line: 3, .. }));
    }

    #[test]
    fn parse_rejects_empty_username() {
        let err = CredentialRecord::parse_line(":hash", 1).unwrap_err();
        assert!(matches!(err, MqttCredError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn parse_rejects_empty_hash() {
        assert!(CredentialRecord::parse_line("alice:", 1).is_err());
    }

    #[test]
    fn parse_rejects_blank_line() {
        assert!(CredentialRecord::parse_line("", 2).is_err());
    }

    #[test]
    fn to_line_appends_newline() {
        let rec = CredentialRecord::new("bob", "$tok");
        assert_eq!(rec.to_line(), "bob:$tok\n");
    }

    #[test]
    fn valid_usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("sensor-01").is_ok());
        assert!(validate_username("user@example.com").is_ok());
    }

    #[test]
    fn rejects_bad_usernames() {
        assert!(validate_username("").is_err());
        assert!(validate_username("a:b").is_err());
        assert!(validate_username("a\nb").is_err());
        assert!(validate_username("a\rb").is_err());
    }
}
