//! Custom error types for ModernMT API operations

use thiserror::Error;

/// Errors returned by the ModernMT client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Structured API error from a well-formed response envelope
    #[error("API error: {status} - {error_type}: {message}")]
    Api {
        status: i64,
        error_type: String,
        message: String,
    },

    /// Network error
    #[error("Network error: {message}")]
    Network {
        message: String,
    },

    /// Response body was not a valid API envelope
    #[error("Invalid response: {message}")]
    InvalidResponse {
        message: String,
    },

    /// Callback signature could not be verified
    #[error("Signature verification failed: {message}")]
    Signature {
        message: String,
    },

    /// Verification key could not be retrieved or parsed
    #[error("Key retrieval failed: {message}")]
    KeyRetrieval {
        message: String,
    },

    /// Callback metadata did not match the caller-supplied type
    #[error("Metadata deserialization failed: {0}")]
    Metadata(#[source] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<anyhow::Error> for ClientError {
    fn from(err: anyhow::Error) -> Self {
        ClientError::InvalidResponse {
            message: err.to_string(),
        }
    }
}

/// Result type for ModernMT client operations
pub type Result<T> = std::result::Result<T, ClientError>;
