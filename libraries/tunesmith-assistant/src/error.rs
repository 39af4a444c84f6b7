//! Error types for the assistant.

use thiserror::Error;
use tunesmith_core::ErrorKind;

/// Errors from the language model backend.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// No API key configured
    #[error("Language model API key is missing")]
    MissingCredential,

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Model endpoint returned an error response
    #[error("Model error ({status}): {message}")]
    Service { status: u16, message: String },

    /// Model answered with no text
    #[error("Model returned no text")]
    EmptyResponse,

    /// Model text did not contain the expected JSON
    #[error("Malformed model output: {0}")]
    MalformedOutput(String),
}

impl AssistantError {
    /// User-facing category when this error hits playlist generation.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::PlaylistGenerationFailure
    }

    /// Whether the model never produced an answer (network, service, quota).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AssistantError::Request(_) | AssistantError::Service { .. }
        )
    }
}

/// Result type for assistant operations.
pub type Result<T> = std::result::Result<T, AssistantError>;
