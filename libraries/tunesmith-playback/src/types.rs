//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tunesmith_core::{ErrorKind, Track};

/// Entry of the play queue
///
/// Same shape as a track: name, source URL, thumbnail and (once known) the
/// resolved local file.
pub type QueueEntry = Track;

/// Playback state machine
///
/// ```text
/// Idle ──► Loading ──► Playing ⇄ Paused
///            │  ▲         │        │
///            ▼  │         └────────┴──► Loading (track change)
///           Error
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No track requested yet
    Idle,

    /// Resolving or opening a track
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// Last load or playback failed
    Error,
}

impl PlaybackState {
    /// Whether transport controls (play/pause/seek) apply
    pub fn has_transport(&self) -> bool {
        matches!(self, PlaybackState::Playing | PlaybackState::Paused)
    }
}

/// Read-only view of the session for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    /// Transport state
    pub state: PlaybackState,

    /// Last successfully loaded track (kept on error)
    pub current_track: Option<Track>,

    /// Position in the active playlist, `-1` when nothing is selected
    pub cursor_index: isize,

    /// A load is in progress
    pub is_loading: bool,

    /// Audio is playing
    pub is_playing: bool,

    /// Position / duration in [0, 1]
    pub progress_ratio: f64,

    /// Duration of the current media, 0 when unknown
    pub duration_seconds: f64,

    /// Current position
    pub position_seconds: f64,

    /// Last failure, cleared by the next successful load
    pub last_error: Option<ErrorKind>,

    /// Whether "previous" should be enabled
    pub has_previous: bool,

    /// Whether "next" should be enabled
    pub has_next: bool,

    /// Number of queued entries
    pub queue_len: usize,
}

/// Configuration for the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Upper bound for one resolve call (default: 15s)
    pub resolve_timeout: Duration,

    /// Capacity of the event broadcast channel (default: 64)
    pub event_capacity: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            resolve_timeout: Duration::from_secs(15),
            event_capacity: 64,
        }
    }
}

/// Render seconds as `m:ss`; unknown or negative values render as `0:00`
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
