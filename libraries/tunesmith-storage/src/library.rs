//! Saved playlists
//!
//! The library keeps the authoritative copy in memory and writes the whole
//! list through to the store after every mutation. Store failures are
//! logged and switch the library to session-only mode; they never fail
//! the operation.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tunesmith_core::{export, CoreError, KeyValueStore, Playlist, PlaylistId, Result, Song};

/// Store key of the playlist list
pub const PLAYLISTS_KEY: &str = "playlists";

/// Store key of the active playlist
pub const ACTIVE_PLAYLIST_KEY: &str = "activePlaylist";

/// Saved playlists, newest first, plus the active one
pub struct PlaylistLibrary {
    store: Arc<dyn KeyValueStore>,
    playlists: Vec<Playlist>,
    active: Option<PlaylistId>,
    persistent: bool,
}

impl PlaylistLibrary {
    /// Load the library from `store`
    ///
    /// An unreadable store gives an empty, session-only library. Unparseable
    /// entries are skipped.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mut library = Self {
            store,
            playlists: Vec::new(),
            active: None,
            persistent: true,
        };

        match library.store.get(PLAYLISTS_KEY).await {
            Ok(Some(json)) => library.playlists = parse_playlists(&json),
            Ok(None) => {}
            Err(e) => library.degrade("load playlists", &e),
        }

        match library.store.get(ACTIVE_PLAYLIST_KEY).await {
            Ok(Some(json)) => match serde_json::from_str::<Playlist>(&json) {
                Ok(active) => library.restore_active(active),
                Err(e) => warn!(error = %e, "Ignoring unreadable active playlist"),
            },
            Ok(None) => {}
            Err(e) => library.degrade("load active playlist", &e),
        }

        info!(
            playlists = library.playlists.len(),
            persistent = library.persistent,
            "Playlist library loaded"
        );
        library
    }

    // ===== Mutations =====

    /// Insert `playlist` at the front
    pub async fn add(&mut self, playlist: Playlist) -> PlaylistId {
        let id = playlist.id.clone();
        info!(playlist_id = %id, name = %playlist.name, songs = playlist.len(), "Saving playlist");
        self.playlists.insert(0, playlist);
        self.persist_playlists().await;
        id
    }

    /// Create a playlist from an exported CSV document and save it
    pub async fn import_csv(&mut self, name: &str, csv: &str) -> Result<PlaylistId> {
        let songs = export::parse_csv(csv)?;
        let name = if name.trim().is_empty() {
            "Imported playlist"
        } else {
            name.trim()
        };
        Ok(self.add(Playlist::new(name, songs)).await)
    }

    /// Append `song` to the playlist `id`
    pub async fn append_song(&mut self, id: &PlaylistId, song: Song) -> Result<()> {
        let playlist = self
            .playlists
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CoreError::PlaylistNotFound(id.clone()))?;

        debug!(playlist_id = %id, song = %song.display_name(), "Appending song");
        playlist.push(song);
        self.persist_playlists().await;
        if self.active.as_ref() == Some(id) {
            self.persist_active().await;
        }
        Ok(())
    }

    /// Delete the playlist `id`
    ///
    /// Deleting the active playlist clears the selection.
    pub async fn delete(&mut self, id: &PlaylistId) -> Result<Playlist> {
        let position = self
            .playlists
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| CoreError::PlaylistNotFound(id.clone()))?;

        let removed = self.playlists.remove(position);
        info!(playlist_id = %id, name = %removed.name, "Deleted playlist");
        self.persist_playlists().await;

        if self.active.as_ref() == Some(id) {
            self.active = None;
            self.persist_active().await;
        }
        Ok(removed)
    }

    /// Make `id` the active playlist
    pub async fn set_active(&mut self, id: &PlaylistId) -> Result<&Playlist> {
        if !self.playlists.iter().any(|p| &p.id == id) {
            return Err(CoreError::PlaylistNotFound(id.clone()));
        }
        self.active = Some(id.clone());
        self.persist_active().await;
        self.get(id)
            .ok_or_else(|| CoreError::PlaylistNotFound(id.clone()))
    }

    // ===== Queries =====

    /// All playlists, newest first
    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn get(&self, id: &PlaylistId) -> Option<&Playlist> {
        self.playlists.iter().find(|p| &p.id == id)
    }

    /// Playlist at `index` in display order
    pub fn at(&self, index: usize) -> Option<&Playlist> {
        self.playlists.get(index)
    }

    pub fn active(&self) -> Option<&Playlist> {
        self.active.as_ref().and_then(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    /// Whether changes are still reaching the store
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    // ===== Persistence =====

    fn restore_active(&mut self, active: Playlist) {
        if self.get(&active.id).is_none() {
            // Active playlist saved without a list entry
            self.playlists.insert(0, active.clone());
        }
        self.active = Some(active.id);
    }

    async fn persist_playlists(&mut self) {
        let result = match serde_json::to_string(&self.playlists) {
            Ok(json) => self.store.put(PLAYLISTS_KEY, &json).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            self.degrade("save playlists", &e);
        }
    }

    async fn persist_active(&mut self) {
        let result = match self.active() {
            Some(playlist) => match serde_json::to_string(playlist) {
                Ok(json) => self.store.put(ACTIVE_PLAYLIST_KEY, &json).await,
                Err(e) => Err(e.into()),
            },
            None => self.store.remove(ACTIVE_PLAYLIST_KEY).await,
        };
        if let Err(e) = result {
            self.degrade("save active playlist", &e);
        }
    }

    fn degrade(&mut self, operation: &str, error: &CoreError) {
        if self.persistent {
            warn!(
                operation,
                error = %error,
                "Storage unavailable, playlists will not persist this session"
            );
        }
        self.persistent = false;
    }
}

impl std::fmt::Debug for PlaylistLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaylistLibrary")
            .field("playlists", &self.playlists.len())
            .field("active", &self.active)
            .field("persistent", &self.persistent)
            .finish_non_exhaustive()
    }
}

/// Parse the stored list, skipping entries that no longer deserialize
fn parse_playlists(json: &str) -> Vec<Playlist> {
    let entries = match serde_json::from_str::<Vec<Value>>(json) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "Stored playlists are unreadable, starting empty");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Playlist>(entry) {
            Ok(playlist) => Some(playlist),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable playlist");
                None
            }
        })
        .collect()
}
