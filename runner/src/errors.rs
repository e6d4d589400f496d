//! Error types for the deployment runner

use thiserror::Error;

/// Main error type for the deployment runner
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Malformed deployment request: {0}")]
    MalformedRequest(String),

    #[error("Executor error: {0}")]
    ExecutorError(String),

    #[error("Fee parse error: {0}")]
    FeeParseError(String),

    #[error("Task store error: {0}")]
    StoreError(String),

    #[error("Queue transport error: {0}")]
    TransportError(String),

    #[error("Event publish error: {0}")]
    EventError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}
