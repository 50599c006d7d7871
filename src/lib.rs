pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod policy;
pub mod store;

#[cfg(feature = "history")]
pub mod history;
