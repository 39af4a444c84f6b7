use std::path::PathBuf;

use thiserror::Error;
use tunesmith_client::ClientError;
use tunesmith_playback::PlaybackError;

/// Failures of the speaker output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("No audio output device: {0}")]
    Device(#[from] rodio::StreamError),

    #[error("Cannot use media cache {}: {source}", path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("Media download failed: {0}")]
    Download(#[from] ClientError),

    #[error("Audio thread is not running")]
    ThreadGone,
}

pub type Result<T> = std::result::Result<T, OutputError>;

impl From<OutputError> for PlaybackError {
    fn from(err: OutputError) -> Self {
        PlaybackError::Output(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_into_playback_output_error() {
        let err = OutputError::Cache {
            path: PathBuf::from("/tmp/media"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        match PlaybackError::from(err) {
            PlaybackError::Output(message) => {
                assert!(message.starts_with("Cannot use media cache /tmp/media"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_thread_is_an_output_error() {
        let err: PlaybackError = OutputError::ThreadGone.into();
        assert_eq!(err.kind(), tunesmith_core::ErrorKind::MediaPlaybackError);
    }
}
