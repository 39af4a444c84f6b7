//! Playback Events
//!
//! Change notifications for subscribers (REPL, UI). The session queues
//! them as it mutates; the [`Player`](crate::Player) broadcasts them after
//! each command.

use crate::types::PlaybackState;
use serde::{Deserialize, Serialize};
use tunesmith_core::{ErrorKind, TrackId};

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Transport state changed
    StateChanged {
        /// The new state
        state: PlaybackState,
    },

    /// A new track became the current one
    TrackChanged {
        /// ID of the new track
        track_id: TrackId,
        /// Display name of the new track
        name: String,
    },

    /// Embeddable preview URL for the track being loaded
    PreviewChanged {
        /// Embed-style URL
        embed_url: String,
    },

    /// Track reached its end
    TrackFinished {
        /// ID of the finished track
        track_id: TrackId,
    },

    /// Position update from the media output
    PositionUpdate {
        /// Current position in seconds
        position_seconds: f64,
        /// Duration in seconds (0 when unknown)
        duration_seconds: f64,
    },

    /// Queue contents changed
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Playlist cursor moved or the active playlist was replaced
    CursorChanged {
        /// New cursor index (`-1` for none)
        index: isize,
        /// Length of the active playlist
        length: usize,
    },

    /// A load or playback failure
    Error {
        /// Category of the failure
        kind: ErrorKind,
        /// Human-readable detail
        message: String,
    },
}

impl PlaybackEvent {
    /// Whether this event reports a failure
    pub fn is_error(&self) -> bool {
        matches!(self, PlaybackEvent::Error { .. })
    }
}
