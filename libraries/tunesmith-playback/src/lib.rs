//! Tunesmith - Playback Engine
//!
//! Decides what is loaded, what plays next, and how search results become
//! playable audio.
//!
//! This crate provides:
//! - Play queue with played-through draining
//! - Playlist cursor with boundary-checked next/previous
//! - Playback session state machine (`Idle → Loading → Playing ⇄ Paused`,
//!   plus `Error` and retry)
//! - Resolver with single in-flight resolution, supersession and timeout
//! - Async [`Player`] that serializes commands and broadcasts events
//!
//! # Architecture
//!
//! The session is synchronous and does no I/O. It hands back a
//! [`LoadDecision`] and the [`Player`] carries it out: resolving through a
//! [`MediaService`](tunesmith_core::MediaService), then opening the file on
//! a [`MediaOutput`]. Audio devices are provided by the application.
//!
//! # Example: Queue Priority
//!
//! ```rust
//! use tunesmith_core::Track;
//! use tunesmith_playback::{LoadDecision, PlaybackSession, PlaybackState};
//!
//! let mut session = PlaybackSession::new();
//!
//! let mut a = Track::new("A", "https://youtu.be/a", "");
//! a.set_local_file("a.mp3");
//! let mut b = Track::new("B", "https://youtu.be/b", "");
//! b.set_local_file("b.mp3");
//!
//! // Enqueue onto an idle session starts playback at once
//! let first = session.enqueue(a.clone());
//! assert!(matches!(first, Some(LoadDecision::Ready { .. })));
//! session.enqueue(b.clone());
//!
//! // When A ends, the queue supplies B
//! let next = session.on_track_ended(session.generation());
//! assert_eq!(next.map(|d| d.track().id.clone()), Some(b.id));
//! assert_eq!(session.state(), PlaybackState::Playing);
//! assert_eq!(session.queue().len(), 1);
//! ```

pub mod cursor;
pub mod error;
pub mod events;
pub mod output;
pub mod player;
pub mod queue;
pub mod resolver;
pub mod session;
pub mod types;

pub use cursor::{CursorStep, PlaylistCursor};
pub use error::{PlaybackError, ResolveError, Result};
pub use events::PlaybackEvent;
pub use output::{MediaOutput, NullOutput};
pub use player::Player;
pub use queue::{Queue, QueueAdvance};
pub use resolver::{embed_url, Resolver};
pub use session::{LoadDecision, PlaybackSession, Transport};
pub use types::{format_time, PlaybackConfig, PlaybackSnapshot, PlaybackState, QueueEntry};
