//! Playback session - single owner of "what is loaded"
//!
//! The session is synchronous. Commands mutate state and return a
//! [`LoadDecision`] telling the driver what to do next (hand a file to the
//! output, or resolve first). Results of asynchronous work come back
//! tagged with the generation they were started under; anything older
//! than the current generation is discarded.

use crate::{
    cursor::{CursorStep, PlaylistCursor},
    error::{PlaybackError, ResolveError, Result},
    events::PlaybackEvent,
    queue::{Queue, QueueAdvance},
    types::{PlaybackSnapshot, PlaybackState, QueueEntry},
};
use std::time::Duration;
use tunesmith_core::{ErrorKind, Track};

/// What the driver must do after a load request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadDecision {
    /// Media is known: open `track.local_file` on the output and play
    Ready {
        /// Track to open
        track: Track,
        /// Generation to tag output callbacks with
        generation: u64,
    },

    /// Media unknown: resolve the track, then report back through
    /// [`PlaybackSession::complete_resolution`]
    Resolve {
        /// Track to resolve
        track: Track,
        /// Generation the resolution belongs to
        generation: u64,
    },
}

impl LoadDecision {
    /// Generation the decision was made under
    pub fn generation(&self) -> u64 {
        match self {
            LoadDecision::Ready { generation, .. } | LoadDecision::Resolve { generation, .. } => {
                *generation
            }
        }
    }

    /// Track being loaded
    pub fn track(&self) -> &Track {
        match self {
            LoadDecision::Ready { track, .. } | LoadDecision::Resolve { track, .. } => track,
        }
    }
}

/// Transport command for the output after a play/pause toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Resume output
    Play,
    /// Pause output
    Pause,
}

/// Playback session state machine
#[derive(Debug)]
pub struct PlaybackSession {
    state: PlaybackState,

    // Last successfully loaded track, kept on failure
    current_track: Option<Track>,

    // Track of the load in progress (or last failed load)
    target: Option<Track>,

    generation: u64,

    queue: Queue,
    cursor: PlaylistCursor,

    duration_seconds: f64,
    position_seconds: f64,
    last_error: Option<ErrorKind>,

    // Event queue for subscribers
    pending_events: Vec<PlaybackEvent>,
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackSession {
    /// Create an idle session
    pub fn new() -> Self {
        Self {
            state: PlaybackState::Idle,
            current_track: None,
            target: None,
            generation: 0,
            queue: Queue::new(),
            cursor: PlaylistCursor::new(),
            duration_seconds: 0.0,
            position_seconds: 0.0,
            last_error: None,
            pending_events: Vec::new(),
        }
    }

    // ===== Loading =====

    /// Start loading `track`
    ///
    /// Returns `None` when the same track is already loading.
    pub fn load_and_play(&mut self, track: Track) -> Option<LoadDecision> {
        if self.state == PlaybackState::Loading
            && self.target.as_ref().is_some_and(|t| t.id == track.id)
        {
            tracing::debug!(track_id = %track.id, "Track already loading");
            return None;
        }

        self.generation += 1;
        let generation = self.generation;
        tracing::debug!(track_id = %track.id, generation, name = %track.name, "Loading track");

        self.target = Some(track.clone());
        self.set_state(PlaybackState::Loading);

        if track.is_resolved() {
            self.commit(track.clone());
            Some(LoadDecision::Ready { track, generation })
        } else {
            Some(LoadDecision::Resolve { track, generation })
        }
    }

    /// Report the outcome of a resolution
    ///
    /// Returns the track to open when the result is current and successful.
    pub fn complete_resolution(
        &mut self,
        generation: u64,
        result: std::result::Result<Track, ResolveError>,
    ) -> Option<Track> {
        if generation != self.generation {
            tracing::warn!(
                generation,
                current = self.generation,
                "Discarding stale resolution"
            );
            return None;
        }

        match result {
            Ok(track) => {
                if let Some(local_file) = track.local_file.as_deref() {
                    self.cursor.set_source_url(&track.id, &track.source_url);
                    let queued = self.queue.backfill(&track.source_url, local_file);
                    let listed = self.cursor.backfill(&track.source_url, local_file);
                    tracing::debug!(track_id = %track.id, queued, listed, "Backfilled local file");
                }
                self.commit(track.clone());
                Some(track)
            }
            Err(e) => {
                self.fail(ErrorKind::ResolutionError, e.to_string());
                None
            }
        }
    }

    /// Retry the last failed load
    pub fn retry(&mut self) -> Option<LoadDecision> {
        if self.state != PlaybackState::Error {
            return None;
        }
        let track = self.target.clone().or_else(|| self.current_track.clone())?;
        self.load_and_play(track)
    }

    fn commit(&mut self, track: Track) {
        tracing::info!(track_id = %track.id, name = %track.name, "Now playing");
        self.pending_events.push(PlaybackEvent::TrackChanged {
            track_id: track.id.clone(),
            name: track.name.clone(),
        });
        self.target = Some(track.clone());
        self.current_track = Some(track);
        self.duration_seconds = 0.0;
        self.position_seconds = 0.0;
        self.last_error = None;
        self.set_state(PlaybackState::Playing);
    }

    fn fail(&mut self, kind: ErrorKind, message: String) {
        tracing::error!(%kind, generation = self.generation, "{}", message);
        self.last_error = Some(kind);
        self.pending_events
            .push(PlaybackEvent::Error { kind, message });
        self.set_state(PlaybackState::Error);
    }

    // ===== Playback Control =====

    /// Toggle between playing and paused
    ///
    /// No-op outside `Playing`/`Paused`.
    pub fn toggle_play_pause(&mut self) -> Option<Transport> {
        match self.state {
            PlaybackState::Playing => {
                self.set_state(PlaybackState::Paused);
                Some(Transport::Pause)
            }
            PlaybackState::Paused => {
                self.set_state(PlaybackState::Playing);
                Some(Transport::Play)
            }
            _ => None,
        }
    }

    /// Map a ratio of the duration to an absolute position
    pub fn seek(&mut self, ratio: f64) -> Result<Duration> {
        if !self.state.has_transport() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        if ratio.is_nan() {
            return Err(PlaybackError::InvalidSeekRatio(ratio));
        }
        if self.duration_seconds <= 0.0 || !self.duration_seconds.is_finite() {
            return Err(PlaybackError::DurationUnknown);
        }

        let position = ratio.clamp(0.0, 1.0) * self.duration_seconds;
        self.position_seconds = position;
        self.emit_position();
        Ok(Duration::from_secs_f64(position))
    }

    /// Step the playlist cursor forward and load that track
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<LoadDecision> {
        let step = self.cursor.next();
        self.follow_cursor(step)
    }

    /// Step the playlist cursor back and load that track
    pub fn previous(&mut self) -> Option<LoadDecision> {
        let step = self.cursor.previous();
        self.follow_cursor(step)
    }

    fn follow_cursor(&mut self, step: CursorStep) -> Option<LoadDecision> {
        match step {
            CursorStep::Moved { track, .. } => {
                self.emit_cursor_changed();
                self.load_and_play(track)
            }
            CursorStep::Boundary => None,
        }
    }

    // ===== Output Callbacks =====

    /// The current track played to its end
    ///
    /// Queue first; the playlist cursor only when the queue has no match or
    /// has just run out.
    pub fn on_track_ended(&mut self, generation: u64) -> Option<LoadDecision> {
        if generation != self.generation {
            return None;
        }
        let finished = self.current_track.clone()?;
        self.pending_events.push(PlaybackEvent::TrackFinished {
            track_id: finished.id.clone(),
        });

        match self.queue.advance_from(&finished.id) {
            QueueAdvance::Next(entry) => {
                self.emit_queue_changed();
                return self.load_and_play(entry);
            }
            QueueAdvance::Exhausted => {
                tracing::debug!("Queue exhausted, falling back to playlist");
                self.emit_queue_changed();
            }
            QueueAdvance::NotFound => {}
        }

        match self.cursor.next() {
            step @ CursorStep::Moved { .. } => self.follow_cursor(step),
            CursorStep::Boundary => {
                self.position_seconds = self.duration_seconds;
                self.set_state(PlaybackState::Idle);
                None
            }
        }
    }

    /// Output opened the media and knows its duration
    pub fn on_media_ready(&mut self, generation: u64, duration_seconds: Option<f64>) {
        if generation != self.generation {
            return;
        }
        self.duration_seconds = duration_seconds
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(0.0);
        self.emit_position();
    }

    /// Periodic position report from the output
    pub fn on_progress(&mut self, generation: u64, position_seconds: f64) {
        if generation != self.generation || !position_seconds.is_finite() {
            return;
        }
        self.position_seconds = position_seconds.max(0.0);
        self.emit_position();
    }

    /// Output failed to decode or fetch the media
    pub fn on_media_error(&mut self, generation: u64, message: impl Into<String>) {
        if generation != self.generation {
            return;
        }
        self.fail(ErrorKind::MediaPlaybackError, message.into());
    }

    // ===== Queue Management =====

    /// Append to the queue, starting it when nothing is playing
    pub fn enqueue(&mut self, entry: QueueEntry) -> Option<LoadDecision> {
        let was_empty = self.queue.is_empty();
        self.queue.enqueue(entry.clone());
        self.emit_queue_changed();

        if was_empty && matches!(self.state, PlaybackState::Idle | PlaybackState::Error) {
            self.load_and_play(entry)
        } else {
            None
        }
    }

    /// Remove a queued entry; the playing track is unaffected
    pub fn dequeue(&mut self, index: usize) -> Option<QueueEntry> {
        let removed = self.queue.dequeue(index);
        if removed.is_some() {
            self.emit_queue_changed();
        }
        removed
    }

    /// Empty the queue without stopping playback
    pub fn clear_queue(&mut self) {
        self.queue.clear();
        self.emit_queue_changed();
    }

    /// Queued entries in playback order
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    // ===== Playlist =====

    /// Replace the active playlist; the cursor resets to its first track
    pub fn set_active_playlist(&mut self, tracks: Vec<Track>) {
        self.cursor.set_active_playlist(tracks);
        self.emit_cursor_changed();
    }

    /// Grow the active playlist without moving the cursor
    pub fn append_to_playlist(&mut self, track: Track) {
        self.cursor.append(track);
        self.emit_cursor_changed();
    }

    /// Load the playlist track at `index`
    pub fn play_from_playlist(&mut self, index: usize) -> Result<Option<LoadDecision>> {
        let step = self.cursor.select(index).ok_or_else(|| {
            PlaybackError::InvalidOperation(format!(
                "playlist has {} tracks, no index {}",
                self.cursor.len(),
                index
            ))
        })?;
        Ok(self.follow_cursor(step))
    }

    /// The active playlist cursor
    pub fn cursor(&self) -> &PlaylistCursor {
        &self.cursor
    }

    // ===== State Queries =====

    /// Current state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Last successfully loaded track
    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    /// Generation of the most recent load
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a generation is still the current one
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Whether "next" has somewhere to go
    pub fn has_next(&self) -> bool {
        let queued_after_current = self.current_track.as_ref().is_some_and(|t| {
            self.queue
                .position(&t.id)
                .is_some_and(|i| i + 1 < self.queue.len())
        });
        queued_after_current || self.cursor.has_next()
    }

    /// Render-ready view of the session
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let progress_ratio = if self.duration_seconds > 0.0 {
            (self.position_seconds / self.duration_seconds).clamp(0.0, 1.0)
        } else {
            0.0
        };
        PlaybackSnapshot {
            state: self.state,
            current_track: self.current_track.clone(),
            cursor_index: self.cursor.cursor_index(),
            is_loading: self.state == PlaybackState::Loading,
            is_playing: self.state == PlaybackState::Playing,
            progress_ratio,
            duration_seconds: self.duration_seconds,
            position_seconds: self.position_seconds,
            last_error: self.last_error,
            has_previous: self.cursor.has_previous(),
            has_next: self.has_next(),
            queue_len: self.queue.len(),
        }
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            tracing::debug!(from = ?self.state, to = ?state, "State changed");
            self.state = state;
            self.pending_events
                .push(PlaybackEvent::StateChanged { state });
        }
    }

    fn emit_queue_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    fn emit_cursor_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::CursorChanged {
            index: self.cursor.cursor_index(),
            length: self.cursor.len(),
        });
    }

    fn emit_position(&mut self) {
        self.pending_events.push(PlaybackEvent::PositionUpdate {
            position_seconds: self.position_seconds,
            duration_seconds: self.duration_seconds,
        });
    }
}
