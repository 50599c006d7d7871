//! Password shape policy.
//!
//! Checked by the CLI before a credential is added.  The store never
//! re-validates passwords, so the policy can change without touching
//! the storage layer.

use crate::errors::{MqttCredError, Result};

/// Length bounds and character-class rules for new passwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum length in characters (default: 8).
    pub min_len: usize,
    /// Maximum length in characters (default: 16).
    pub max_len: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_len: 8,
            max_len: 16,
        }
    }
}

impl PasswordPolicy {
    /// Accept a password only if its length is within bounds and it
    /// contains at least one ASCII letter and one ASCII digit.
    pub fn check(&self, password: &str) -> Result<()> {
        let len = password.chars().count();
        if len < self.min_len || len > self.max_len {
            return Err(MqttCredError::WeakPassword(format!(
                "must be {}-{} characters long (got {len})",
                self.min_len, self.max_len
            )));
        }
        if !password.chars().any(|c| c.is_ascii_alphabetic()) {
            return Err(MqttCredError::WeakPassword(
                "must contain at least one letter".into(),
            ));
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(MqttCredError::WeakPassword(
                "must contain at least one digit".into(),
            ));
        }
        Ok(())
    }

    /// One-line description suitable for a prompt hint.
    pub fn describe(&self) -> String {
        format!(
            "Password must be {}-{} characters long and contain both letters and numbers.",
            self.min_len, self.max_len
        )
    }
}

/// Check a password against the default policy.
pub fn validate_password(password: &str) -> Result<()> {
    PasswordPolicy::default().check(password)
}
