//! Error types for Chat-Peaks

use thiserror::Error;

/// Result type alias for Chat-Peaks operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Chat-Peaks
#[derive(Error, Debug)]
pub enum Error {
    /// Window, threshold or peak parameters outside their valid range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// An event that violates the event table contract
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// Chat log could not be read
    #[error("Ingest error: {0}")]
    Ingest(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization errors while rendering output
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A background analysis was cancelled before it completed
    #[error("Analysis cancelled")]
    Cancelled,

    /// Generic error wrapper
    #[error("Error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Configuration(e.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Self {
        Error::Other(format!("analysis worker failed: {e}"))
    }
}
