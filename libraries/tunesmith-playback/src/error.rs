//! Error types for playback management

use std::time::Duration;
use thiserror::Error;
use tunesmith_core::{CoreError, ErrorKind};

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Duration unknown, so a ratio cannot be mapped to a position
    #[error("Cannot seek: duration unknown")]
    DurationUnknown,

    /// Seek ratio outside [0, 1]
    #[error("Invalid seek ratio: {0}")]
    InvalidSeekRatio(f64),

    /// Operation not valid in the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Track resolution failed
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Audio output error
    #[error("Media output error: {0}")]
    Output(String),

    /// Search backend error
    #[error(transparent)]
    Service(#[from] CoreError),
}

impl PlaybackError {
    /// User-facing category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlaybackError::Resolve(_) | PlaybackError::Service(_) => ErrorKind::ResolutionError,
            _ => ErrorKind::MediaPlaybackError,
        }
    }
}

/// Failures of a single resolve call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A resolution for the same source URL and generation is still running
    #[error("Already resolving {0}")]
    AlreadyInFlight(String),

    /// A newer resolution replaced this one
    #[error("Resolution superseded")]
    Superseded,

    /// The service did not answer in time
    #[error("Resolution timed out after {0:?}")]
    Timeout(Duration),

    /// Searching for the track's source found nothing
    #[error("No source found for \"{0}\"")]
    NoSource(String),

    /// Network or service failure
    #[error("Resolution failed: {0}")]
    Service(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_errors_map_to_resolution_kind() {
        let err = PlaybackError::from(ResolveError::Timeout(Duration::from_secs(15)));
        assert_eq!(err.kind(), ErrorKind::ResolutionError);
    }

    #[test]
    fn output_errors_map_to_media_kind() {
        let err = PlaybackError::Output("device lost".into());
        assert_eq!(err.kind(), ErrorKind::MediaPlaybackError);
    }
}
