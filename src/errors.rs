use thiserror::Error;

/// All errors that can occur in mqttcred.
#[derive(Debug, Error)]
pub enum MqttCredError {
    // --- Store errors ---
    #[error("Username '{0}' already exists — choose a different username")]
    AlreadyExists(String),

    #[error("Username '{0}' not found")]
    NotFound(String),

    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    // --- Hashing errors ---
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Malformed hash token: {0}")]
    MalformedToken(String),

    // --- Policy errors ---
    #[error("Password rejected: {0}")]
    WeakPassword(String),

    #[error("Password does not match the stored hash for '{0}'")]
    VerificationFailed(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Change history errors ---
    #[error("Change history error: {0}")]
    HistoryError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for mqttcred results.
pub type Result<T> = std::result::Result<T, MqttCredError>;
