//! Password hashing primitives for mqttcred.
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA512 hashing and verification (`hasher`)
//! - The self-describing `$pbkdf2-sha512$...` token format (`token`)

pub mod hasher;
pub mod token;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{hash_password, verify_password, HashToken};
pub use hasher::{
    generate_salt, hash_password, hash_password_with_params, verify_password, Pbkdf2Params,
};
pub use token::HashToken;
