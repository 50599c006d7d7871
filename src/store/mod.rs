//! Store module — the credentials file.
//!
//! This module provides:
//! - `CredentialRecord` and username validation (`record`)
//! - Line-oriented file reads, appends, and atomic rewrites (`format`)
//! - High-level `CredentialStore` for adding, removing, and looking up users (`credentials`)

pub mod credentials;
pub mod format;
pub mod record;

// Re-export the most commonly used items.
pub use credentials::CredentialStore;
pub use record::{validate_username, CredentialRecord, SEPARATOR};

/// File name used when no other path is configured.
pub const DEFAULT_FILE_NAME: &str = "mqtt_user_credentials.txt";
