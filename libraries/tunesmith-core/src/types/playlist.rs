/// Playlist domain types
use crate::types::PlaylistId;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Number of query characters kept in a fallback playlist name
const FALLBACK_NAME_CHARS: usize = 20;

/// A song as the assistant names it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Song title
    pub title: String,

    /// Artist name
    pub artist: String,
}

impl Song {
    /// Create a new song
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }

    /// The placeholder stored when playlist generation fails
    pub fn placeholder() -> Self {
        Self::new("Unable to generate songs", "Please try again")
    }

    /// `Title - Artist`, also used as the lookup query
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.title, self.artist)
    }
}

/// Persisted playlist
///
/// Songs are only ever appended; a playlist is removed as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name
    pub name: String,

    /// Ordered songs
    pub songs: Vec<Song>,

    /// Creation date (`YYYY-MM-DD`)
    #[serde(alias = "timestamp")]
    pub created_date: String,
}

impl Playlist {
    /// Create a new playlist dated today
    pub fn new(name: impl Into<String>, songs: Vec<Song>) -> Self {
        Self {
            id: PlaylistId::generate(),
            name: name.into(),
            songs,
            created_date: Utc::now().format("%Y-%m-%d").to_string(),
        }
    }

    /// Single-song playlist recording a generation failure for `query`
    pub fn placeholder(query: &str) -> Self {
        Self::new(Self::fallback_name(query), vec![Song::placeholder()])
    }

    /// `Playlist for "<query>"`, truncated to 20 characters with `...`
    pub fn fallback_name(query: &str) -> String {
        let truncated: String = query.chars().take(FALLBACK_NAME_CHARS).collect();
        let ellipsis = if query.chars().count() > FALLBACK_NAME_CHARS {
            "..."
        } else {
            ""
        };
        format!("Playlist for \"{}{}\"", truncated, ellipsis)
    }

    /// Append a song at the end
    pub fn push(&mut self, song: Song) {
        self.songs.push(song);
    }

    /// Number of songs
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Whether the playlist has no songs
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}
