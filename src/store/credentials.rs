//! High-level credential operations used by CLI commands.
//!
//! `CredentialStore` owns the path to one credentials file and the
//! hashing parameters for new records.  It keeps no in-memory copy of
//! the file: every call re-reads what is on disk, so separate CLI runs
//! always see each other's changes.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::crypto::hasher::{hash_password_with_params, verify_password, Pbkdf2Params};
use crate::crypto::token::HashToken;
use crate::errors::{MqttCredError, Result};

use super::format;
use super::record::{validate_username, CredentialRecord};

/// Handle to a credentials file.  Single writer only: two processes
/// mutating the same file at once may lose an update.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    /// Path to the credentials file on disk.
    path: PathBuf,

    /// Parameters used when hashing new passwords.
    params: Pbkdf2Params,
}

impl CredentialStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a handle for the file at `path`.  The file need not exist.
    pub fn new(path: impl Into<PathBuf>, params: Pbkdf2Params) -> Self {
        Self {
            path: path.into(),
            params,
        }
    }

    /// Create a handle using the default PBKDF2 parameters.
    pub fn with_default_params(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Pbkdf2Params::default())
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// All records in file order.
    pub fn records(&self) -> Result<Vec<CredentialRecord>> {
        format::read_records(&self.path)
    }

    /// Returns `true` if a record with exactly this username exists.
    pub fn exists(&self, username: &str) -> Result<bool> {
        Ok(self.records()?.iter().any(|r| r.username == username))
    }

    /// Returns the stored hash token for `username`, if present.
    pub fn find(&self, username: &str) -> Result<Option<String>> {
        Ok(self
            .records()?
            .into_iter()
            .find(|r| r.username == username)
            .map(|r| r.password_hash))
    }

    /// Usernames in file order.  Hash tokens are not exposed.
    pub fn list_all(&self) -> Result<Vec<String>> {
        Ok(self.records()?.into_iter().map(|r| r.username).collect())
    }

    /// Number of records in the store.
    pub fn len(&self) -> Result<usize> {
        Ok(self.records()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Hash `password` and append a new record for `username`.
    ///
    /// Fails with `AlreadyExists` (and writes nothing) if the username is
    /// taken.  Password strength is the caller's concern.
    pub fn add(&self, username: &str, password: &str) -> Result<()> {
        validate_username(username)?;

        if self.exists(username)? {
            return Err(MqttCredError::AlreadyExists(username.to_string()));
        }

        let token = hash_password_with_params(password, &self.params)?;
        let record = CredentialRecord::new(username, token.to_string());
        format::append_record(&self.path, &record)?;

        info!("added credentials for '{username}' to {}", self.path.display());
        Ok(())
    }

    /// Remove the record for `username`, keeping every other record in
    /// its original order.  Returns how many records remain.
    ///
    /// Fails with `NotFound` and leaves the file untouched if no record
    /// matches.
    pub fn remove(&self, username: &str) -> Result<usize> {
        let (removed, kept): (Vec<_>, Vec<_>) = self
            .records()?
            .into_iter()
            .partition(|r| r.username == username);

        if removed.is_empty() {
            return Err(MqttCredError::NotFound(username.to_string()));
        }

        format::write_records(&self.path, &kept)?;

        info!(
            "removed credentials for '{username}' from {} ({} remaining)",
            self.path.display(),
            kept.len()
        );
        Ok(kept.len())
    }

    // ------------------------------------------------------------------
    // Verification
    // ------------------------------------------------------------------

    /// Check `password` against the stored token for `username`.
    pub fn verify(&self, username: &str, password: &str) -> Result<bool> {
        let stored = self
            .find(username)?
            .ok_or_else(|| MqttCredError::NotFound(username.to_string()))?;

        let token = HashToken::parse(&stored)?;
        let matches = verify_password(password, &token);
        debug!("verification for '{username}': {matches}");
        Ok(matches)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the credentials file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the hashing parameters for new records.
    pub fn params(&self) -> &Pbkdf2Params {
        &self.params
    }
}
