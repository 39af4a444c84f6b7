//! Error types for the media service client.

use thiserror::Error;
use tunesmith_core::{CoreError, ErrorKind};

/// Errors that can occur when talking to the media service.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Service returned an error response
    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// Invalid service URL
    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),

    /// Source URL is not a supported watch URL
    #[error("Invalid source URL: {0}")]
    InvalidSourceUrl(String),

    /// Failed to parse service response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// IO error during download
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Service is offline or unreachable
    #[error("Service unreachable: {0}")]
    ServiceUnreachable(String),

    /// Rate limited by service
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },
}

impl ClientError {
    /// User-facing category of this error
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::ResolutionError
    }
}

impl From<ClientError> for CoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Request(_) | ClientError::ServiceUnreachable(_) => {
                CoreError::network(err.to_string())
            }
            ClientError::InvalidUrl(_) | ClientError::InvalidSourceUrl(_) => {
                CoreError::invalid_input(err.to_string())
            }
            ClientError::Io(e) => CoreError::Io(e),
            _ => CoreError::service(err.to_string()),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
