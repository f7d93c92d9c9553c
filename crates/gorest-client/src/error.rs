//! Error types for the GoREST client

use thiserror::Error;

/// Errors that can occur when calling the upstream service
#[derive(Error, Debug)]
pub enum ClientError {
    /// Upstream returned a non-2xx status
    #[error("upstream returned {status}: {body}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Response body was missing or did not match the expected shape
    #[error("failed to deserialize response: {0}")]
    Deserialization(String),

    /// Retried operation failed on every attempt
    #[error("operation failed after {attempts} attempts: {source}")]
    RetryExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Failure of the final attempt
        #[source]
        source: Box<ClientError>,
    },

    /// Connection, TLS or timeout failure
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Client could not be constructed from its configuration
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status of the upstream failure, looking through retry wrapping
    #[must_use]
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ClientError::Upstream { status, .. } => Some(*status),
            ClientError::RetryExhausted { source, .. } => source.upstream_status(),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
