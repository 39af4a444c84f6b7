//! Track resolution
//!
//! Turns a track without media into one with a `local_file`, going through
//! the media service. Every call is tagged with the load generation it
//! belongs to. At most one resolution runs per resolver. A newer generation
//! cancels the running one; an older generation never starts.

use crate::error::ResolveError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tunesmith_core::{MediaService, Track, DEFAULT_THUMBNAIL};
use url::Url;

struct InFlight {
    key: String,
    generation: u64,
    token: CancellationToken,
}

#[derive(Default)]
struct Slot {
    // Highest generation seen through `resolve` or `supersede`
    newest: u64,
    running: Option<InFlight>,
}

/// Resolves tracks against a [`MediaService`]
pub struct Resolver {
    service: Arc<dyn MediaService>,
    timeout: Duration,
    slot: Mutex<Slot>,
}

impl Resolver {
    /// Create a resolver with a per-call timeout
    pub fn new(service: Arc<dyn MediaService>, timeout: Duration) -> Self {
        Self {
            service,
            timeout,
            slot: Mutex::new(Slot::default()),
        }
    }

    /// Resolve `track` for the load request numbered `generation`
    ///
    /// Already-resolved tracks come back unchanged without touching the
    /// service. Tracks without a source URL are looked up by name first.
    pub async fn resolve(&self, track: Track, generation: u64) -> Result<Track, ResolveError> {
        if track.is_resolved() {
            tracing::debug!(track_id = %track.id, "Track already resolved");
            return Ok(track);
        }

        let key = if track.needs_lookup() {
            track.name.clone()
        } else {
            track.source_url.clone()
        };

        let token = self.begin(&key, generation)?;
        tracing::debug!(track_id = %track.id, source = %key, generation, "Resolving track");

        let result = tokio::select! {
            _ = token.cancelled() => Err(ResolveError::Superseded),
            outcome = tokio::time::timeout(self.timeout, self.fetch(track)) => {
                outcome.unwrap_or(Err(ResolveError::Timeout(self.timeout)))
            }
        };

        self.finish(generation);

        match &result {
            Ok(track) => tracing::info!(track_id = %track.id, "Resolved track"),
            Err(ResolveError::Superseded) => tracing::debug!(generation, "Resolution superseded"),
            Err(e) => tracing::warn!(source = %key, error = %e, "Resolution failed"),
        }
        result
    }

    /// A load request numbered `generation` was made
    ///
    /// Cancels any running resolution from an older generation, whether or
    /// not the new request needs the resolver at all.
    pub fn supersede(&self, generation: u64) {
        let mut slot = self.lock();
        slot.newest = slot.newest.max(generation);
        if slot.running.as_ref().is_some_and(|r| r.generation < generation) {
            if let Some(running) = slot.running.take() {
                tracing::debug!(
                    generation = running.generation,
                    newer = generation,
                    "Cancelling resolution"
                );
                running.token.cancel();
            }
        }
    }

    /// Whether a resolution is running
    pub fn is_busy(&self) -> bool {
        self.lock().running.is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, key: &str, generation: u64) -> Result<CancellationToken, ResolveError> {
        let mut slot = self.lock();
        if generation < slot.newest {
            return Err(ResolveError::Superseded);
        }
        slot.newest = generation;

        if let Some(running) = slot.running.take() {
            if running.generation == generation && running.key == key {
                slot.running = Some(running);
                return Err(ResolveError::AlreadyInFlight(key.to_string()));
            }
            running.token.cancel();
        }

        let token = CancellationToken::new();
        slot.running = Some(InFlight {
            key: key.to_string(),
            generation,
            token: token.clone(),
        });
        Ok(token)
    }

    fn finish(&self, generation: u64) {
        let mut slot = self.lock();
        if slot.running.as_ref().is_some_and(|r| r.generation == generation) {
            slot.running = None;
        }
    }

    async fn fetch(&self, mut track: Track) -> Result<Track, ResolveError> {
        if track.needs_lookup() {
            let query = lookup_query(&track.name);
            let hits = self
                .service
                .search(&query)
                .await
                .map_err(|e| ResolveError::Service(e.to_string()))?;
            let hit = hits
                .into_iter()
                .next()
                .ok_or_else(|| ResolveError::NoSource(track.name.clone()))?;

            track.source_url = hit.source_url;
            if track.thumbnail == DEFAULT_THUMBNAIL {
                track.thumbnail = hit.thumbnail;
            }
        }

        let media = self
            .service
            .resolve(&track.source_url)
            .await
            .map_err(|e| ResolveError::Service(e.to_string()))?;
        track.set_local_file(media.local_file);
        Ok(track)
    }

    /// Playable URL for a resolved file
    pub fn media_url(&self, local_file: &str) -> String {
        self.service.media_url(local_file)
    }
}

/// Saved songs are named `Title - Artist`; search wants `Title Artist`
fn lookup_query(name: &str) -> String {
    name.replacen(" - ", " ", 1)
}

/// Embeddable form of a watch URL, for video previews
///
/// Handles `youtube.com/watch?v=<id>`, `youtu.be/<id>` and URLs that are
/// already embeds. Returns `None` for anything else.
pub fn embed_url(source_url: &str) -> Option<String> {
    let with_scheme = if source_url.contains("://") {
        source_url.to_string()
    } else {
        format!("https://{}", source_url)
    };
    let url = Url::parse(&with_scheme).ok()?;
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");

    let video_id = match host {
        "youtu.be" => url.path_segments()?.next().map(str::to_string),
        "youtube.com" => {
            let mut segments = url.path_segments()?;
            match segments.next() {
                Some("watch") => url
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.into_owned()),
                Some("embed") | Some("shorts") => segments.next().map(str::to_string),
                _ => None,
            }
        }
        _ => None,
    }?;

    if video_id.is_empty() {
        return None;
    }
    Some(format!("https://www.youtube.com/embed/{}", video_id))
}
