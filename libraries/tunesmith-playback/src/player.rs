//! Async player
//!
//! Wraps a [`PlaybackSession`] and the [`MediaOutput`] behind one lock so
//! commands and output callbacks are serialized. Resolutions run as
//! background tasks and re-enter through the same lock; the session's
//! generation check drops results for tracks the user has moved away from.
//! Every load decision supersedes older resolutions before anything is
//! spawned, so task scheduling order cannot let an old request win.

use crate::{
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    output::MediaOutput,
    resolver::{embed_url, Resolver},
    session::{LoadDecision, PlaybackSession, Transport},
    types::{PlaybackConfig, PlaybackSnapshot, QueueEntry},
};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tunesmith_core::{MediaService, Playlist, SearchHit, Song, Track};

struct Engine {
    session: PlaybackSession,
    output: Box<dyn MediaOutput>,
    pending: Option<JoinHandle<()>>,
}

struct Inner {
    engine: Mutex<Engine>,
    resolver: Resolver,
    service: Arc<dyn MediaService>,
    events: broadcast::Sender<PlaybackEvent>,
}

/// Cloneable handle to the playback engine
#[derive(Clone)]
pub struct Player {
    inner: Arc<Inner>,
}

impl Player {
    /// Create a player
    ///
    /// Must be called inside a Tokio runtime; resolutions are spawned on it.
    pub fn new(
        service: Arc<dyn MediaService>,
        output: Box<dyn MediaOutput>,
        config: PlaybackConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            inner: Arc::new(Inner {
                engine: Mutex::new(Engine {
                    session: PlaybackSession::new(),
                    output,
                    pending: None,
                }),
                resolver: Resolver::new(Arc::clone(&service), config.resolve_timeout),
                service,
                events,
            }),
        }
    }

    /// Receive change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.inner.events.subscribe()
    }

    // ===== Search =====

    /// Search the media service
    ///
    /// No playback side effects; an empty result is not an error.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let hits = self.inner.service.search(query).await?;
        tracing::info!(query, results = hits.len(), "Search completed");
        Ok(hits)
    }

    // ===== Playback Control =====

    /// Load and play a track
    pub async fn play(&self, track: Track) {
        let mut engine = self.inner.engine.lock().await;
        let decision = engine.session.load_and_play(track);
        self.dispatch(&mut engine, decision);
        self.publish(&mut engine);
    }

    /// Play a search result
    pub async fn play_hit(&self, hit: &SearchHit) {
        self.play(Track::from_hit(hit)).await;
    }

    /// Play a saved song; its source is looked up by title and artist
    pub async fn play_song(&self, song: &Song) {
        self.play(Track::from_song(song)).await;
    }

    /// Toggle play/pause; ignored while idle or loading
    pub async fn toggle_play_pause(&self) {
        let mut engine = self.inner.engine.lock().await;
        let generation = engine.session.generation();
        let result = match engine.session.toggle_play_pause() {
            Some(Transport::Play) => engine.output.play(),
            Some(Transport::Pause) => engine.output.pause(),
            None => Ok(()),
        };
        if let Err(e) = result {
            engine.session.on_media_error(generation, e.to_string());
        }
        self.publish(&mut engine);
    }

    /// Seek to a ratio of the current track's duration
    pub async fn seek(&self, ratio: f64) -> Result<()> {
        let mut engine = self.inner.engine.lock().await;
        let result = match engine.session.seek(ratio) {
            Ok(position) => engine.output.seek(position),
            Err(e) => Err(e),
        };
        self.publish(&mut engine);
        result
    }

    /// Next track of the active playlist
    pub async fn next(&self) {
        let mut engine = self.inner.engine.lock().await;
        let decision = engine.session.next();
        self.dispatch(&mut engine, decision);
        self.publish(&mut engine);
    }

    /// Previous track of the active playlist
    pub async fn previous(&self) {
        let mut engine = self.inner.engine.lock().await;
        let decision = engine.session.previous();
        self.dispatch(&mut engine, decision);
        self.publish(&mut engine);
    }

    /// Retry the last failed load
    pub async fn retry(&self) {
        let mut engine = self.inner.engine.lock().await;
        let decision = engine.session.retry();
        self.dispatch(&mut engine, decision);
        self.publish(&mut engine);
    }

    // ===== Queue Management =====

    /// Append to the queue; starts playback when nothing is playing
    pub async fn enqueue(&self, entry: QueueEntry) {
        let mut engine = self.inner.engine.lock().await;
        let decision = engine.session.enqueue(entry);
        self.dispatch(&mut engine, decision);
        self.publish(&mut engine);
    }

    /// Remove a queued entry by index
    pub async fn dequeue(&self, index: usize) -> Option<QueueEntry> {
        let mut engine = self.inner.engine.lock().await;
        let removed = engine.session.dequeue(index);
        self.publish(&mut engine);
        removed
    }

    /// Empty the queue
    pub async fn clear_queue(&self) {
        let mut engine = self.inner.engine.lock().await;
        engine.session.clear_queue();
        self.publish(&mut engine);
    }

    /// Copy of the queued entries
    pub async fn queue(&self) -> Vec<QueueEntry> {
        self.inner.engine.lock().await.session.queue().entries().to_vec()
    }

    // ===== Playlist =====

    /// Make `playlist` the active playlist without starting it
    pub async fn open_playlist(&self, playlist: &Playlist) {
        let tracks = playlist.songs.iter().map(Track::from_song).collect();
        self.set_active_playlist(tracks).await;
    }

    /// Replace the active playlist
    pub async fn set_active_playlist(&self, tracks: Vec<Track>) {
        let mut engine = self.inner.engine.lock().await;
        engine.session.set_active_playlist(tracks);
        self.publish(&mut engine);
    }

    /// Add a track to the end of the active playlist
    ///
    /// The cursor and the tracks already listed, resolved files included,
    /// are left as they are.
    pub async fn append_to_playlist(&self, track: Track) {
        let mut engine = self.inner.engine.lock().await;
        engine.session.append_to_playlist(track);
        self.publish(&mut engine);
    }

    /// Play the active playlist's track at `index`
    pub async fn play_from_playlist(&self, index: usize) -> Result<()> {
        let mut engine = self.inner.engine.lock().await;
        let result = engine.session.play_from_playlist(index);
        let outcome = match result {
            Ok(decision) => {
                self.dispatch(&mut engine, decision);
                Ok(())
            }
            Err(e) => Err(e),
        };
        self.publish(&mut engine);
        outcome
    }

    // ===== Output Callbacks =====

    /// The output finished the media loaded under `generation`
    pub async fn on_track_ended(&self, generation: u64) {
        let mut engine = self.inner.engine.lock().await;
        let decision = engine.session.on_track_ended(generation);
        if decision.is_none() && engine.session.is_current(generation) {
            if let Err(e) = engine.output.stop() {
                tracing::warn!(error = %e, "Failed to stop output");
            }
        }
        self.dispatch(&mut engine, decision);
        self.publish(&mut engine);
    }

    /// The output opened the media and knows (or not) its duration
    pub async fn on_media_ready(&self, generation: u64, duration_seconds: Option<f64>) {
        let mut engine = self.inner.engine.lock().await;
        engine.session.on_media_ready(generation, duration_seconds);
        self.publish(&mut engine);
    }

    /// Position report
    pub async fn on_progress(&self, generation: u64, position_seconds: f64) {
        let mut engine = self.inner.engine.lock().await;
        engine.session.on_progress(generation, position_seconds);
        self.publish(&mut engine);
    }

    /// Decode or fetch failure in the output
    pub async fn on_media_error(&self, generation: u64, message: String) {
        let mut engine = self.inner.engine.lock().await;
        engine.session.on_media_error(generation, message);
        self.publish(&mut engine);
    }

    // ===== State Queries =====

    /// Render-ready view of the session
    pub async fn snapshot(&self) -> PlaybackSnapshot {
        self.inner.engine.lock().await.session.snapshot()
    }

    /// Wait for the most recent resolution task to finish
    pub async fn settle(&self) {
        loop {
            let pending = self.inner.engine.lock().await.pending.take();
            match pending {
                Some(handle) => {
                    if let Err(e) = handle.await {
                        tracing::warn!(error = %e, "Resolution task failed");
                    }
                }
                None => break,
            }
        }
    }

    // ===== Internals =====

    fn dispatch(&self, engine: &mut Engine, decision: Option<LoadDecision>) {
        let Some(decision) = decision else {
            return;
        };
        self.announce_preview(decision.track());
        self.inner.resolver.supersede(decision.generation());

        match decision {
            LoadDecision::Ready { track, generation } => {
                self.open(engine, &track, generation);
            }
            LoadDecision::Resolve { track, generation } => {
                let player = self.clone();
                let needed_lookup = track.needs_lookup();
                let handle = tokio::spawn(async move {
                    let result = player.inner.resolver.resolve(track, generation).await;
                    if needed_lookup {
                        if let Ok(resolved) = &result {
                            player.announce_preview(resolved);
                        }
                    }

                    let mut engine = player.inner.engine.lock().await;
                    if let Some(track) = engine.session.complete_resolution(generation, result) {
                        player.open(&mut engine, &track, generation);
                    }
                    player.publish(&mut engine);
                });
                engine.pending = Some(handle);
            }
        }
    }

    fn open(&self, engine: &mut Engine, track: &Track, generation: u64) {
        let Some(local_file) = track.local_file.as_deref() else {
            engine
                .session
                .on_media_error(generation, PlaybackError::NoTrackLoaded.to_string());
            return;
        };
        let url = self.inner.resolver.media_url(local_file);
        tracing::debug!(track_id = %track.id, generation, %url, "Opening media");

        let opened = match engine.output.load(&url, generation) {
            Ok(()) => engine.output.play(),
            Err(e) => Err(e),
        };
        if let Err(e) = opened {
            engine.session.on_media_error(generation, e.to_string());
        }
    }

    fn announce_preview(&self, track: &Track) {
        if let Some(embed_url) = embed_url(&track.source_url) {
            let _ = self
                .inner
                .events
                .send(PlaybackEvent::PreviewChanged { embed_url });
        }
    }

    fn publish(&self, engine: &mut Engine) {
        for event in engine.session.drain_events() {
            // No subscribers is fine
            let _ = self.inner.events.send(event);
        }
    }
}
