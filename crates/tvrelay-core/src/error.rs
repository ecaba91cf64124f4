//! Error types for tvrelay

use thiserror::Error;

/// Result type alias using tvrelay's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for tvrelay operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or mismatched webhook secret
    #[error("Invalid secret")]
    Unauthorized,

    /// Evaluation service error
    #[error("Evaluation service error: {0}")]
    Evaluation(String),

    /// Notification service error
    #[error("Notification service error: {0}")]
    Notification(String),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an evaluation error
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Create a notification error
    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification(msg.into())
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
