/// Core error types for Tunesmith
use crate::types::PlaylistId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Tunesmith
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Transport-level failure talking to a remote service
    #[error("Network error: {0}")]
    Network(String),

    /// Remote service answered with an error
    #[error("Service error: {0}")]
    Service(String),

    /// Operation did not finish in time
    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Playlist not found
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// CSV document could not be parsed
    #[error("Malformed CSV at line {line}: {reason}")]
    MalformedCsv { line: usize, reason: String },

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a service error
    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// User-facing failure categories.
///
/// None of these is fatal: assistant failures fall back to deterministic
/// answers, playback failures keep the last valid track on screen and
/// storage failures only lose persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The assistant could not classify a chat message
    IntentClassificationFailure,
    /// The assistant produced no usable playlist (malformed output, missing credential)
    PlaylistGenerationFailure,
    /// Download/service failure while resolving a track
    ResolutionError,
    /// Decode or network failure in the audio layer
    MediaPlaybackError,
    /// Persistent store cannot be read or written
    StorageUnavailable,
}

impl ErrorKind {
    /// Short message suitable for a status line
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::IntentClassificationFailure => "Could not understand that message",
            ErrorKind::PlaylistGenerationFailure => "Could not generate a playlist",
            ErrorKind::ResolutionError => "Could not load that song",
            ErrorKind::MediaPlaybackError => "Error loading audio. Please try again.",
            ErrorKind::StorageUnavailable => "Playlists will not be saved in this session",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::IntentClassificationFailure => "IntentClassificationFailure",
            ErrorKind::PlaylistGenerationFailure => "PlaylistGenerationFailure",
            ErrorKind::ResolutionError => "ResolutionError",
            ErrorKind::MediaPlaybackError => "MediaPlaybackError",
            ErrorKind::StorageUnavailable => "StorageUnavailable",
        };
        f.write_str(name)
    }
}
