//! Error types for dirstore

use thiserror::Error;

/// Core error type for dirstore operations
#[derive(Error, Debug)]
pub enum DirstoreError {
    #[error("Configuration unavailable: {0}")]
    ConfigUnavailable(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Backend unreachable: {0}")]
    BackendUnreachable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for dirstore operations
pub type Result<T> = std::result::Result<T, DirstoreError>;
