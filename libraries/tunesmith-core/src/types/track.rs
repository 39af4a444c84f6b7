/// Track domain types
use crate::types::{Song, TrackId};
use serde::{Deserialize, Serialize};

/// Thumbnail used when the search service has none
pub const DEFAULT_THUMBNAIL: &str = "/images/side.gif";

/// A playable song as the engine sees it
///
/// `local_file` stays `None` until the resolver has fetched the media. Once
/// set it is never replaced, so a resolved track never triggers a second
/// download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Synthetic identity, stable across resolution
    pub id: TrackId,

    /// Display name
    pub name: String,

    /// Watch URL on the source platform (empty until looked up)
    pub source_url: String,

    /// File reference on the media service, once resolved
    #[serde(default)]
    pub local_file: Option<String>,

    /// Thumbnail URL
    pub thumbnail: String,
}

impl Track {
    /// Create an unresolved track
    pub fn new(
        name: impl Into<String>,
        source_url: impl Into<String>,
        thumbnail: impl Into<String>,
    ) -> Self {
        Self {
            id: TrackId::generate(),
            name: name.into(),
            source_url: source_url.into(),
            local_file: None,
            thumbnail: thumbnail.into(),
        }
    }

    /// Create a track from a search result
    pub fn from_hit(hit: &SearchHit) -> Self {
        Self::new(&hit.title, &hit.source_url, &hit.thumbnail)
    }

    /// Create a track for a saved playlist song
    ///
    /// The source URL is unknown; the name doubles as the search query used
    /// to look it up before resolution.
    pub fn from_song(song: &Song) -> Self {
        Self::new(song.display_name(), "", DEFAULT_THUMBNAIL)
    }

    /// Whether the media has already been fetched
    pub fn is_resolved(&self) -> bool {
        self.local_file.is_some()
    }

    /// Whether a search is needed before the track can be resolved
    pub fn needs_lookup(&self) -> bool {
        self.source_url.is_empty()
    }

    /// Record the fetched media file
    ///
    /// Has no effect when the track is already resolved.
    pub fn set_local_file(&mut self, local_file: impl Into<String>) {
        if self.local_file.is_none() {
            self.local_file = Some(local_file.into());
        }
    }
}

/// One row of a search response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    /// Video title
    pub title: String,

    /// Watch URL
    pub source_url: String,

    /// Thumbnail URL
    pub thumbnail: String,
}

impl SearchHit {
    /// Create a search hit, substituting the default thumbnail when empty
    pub fn new(
        title: impl Into<String>,
        source_url: impl Into<String>,
        thumbnail: impl Into<String>,
    ) -> Self {
        let thumbnail = thumbnail.into();
        Self {
            title: title.into(),
            source_url: source_url.into(),
            thumbnail: if thumbnail.is_empty() {
                DEFAULT_THUMBNAIL.to_string()
            } else {
                thumbnail
            },
        }
    }
}

/// Outcome of a successful resolve call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMedia {
    /// File reference to fetch from the media endpoint
    pub local_file: String,

    /// Title reported by the service, if any
    #[serde(default)]
    pub title: Option<String>,

    /// File size in bytes, if reported
    #[serde(default)]
    pub size: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_track_is_unresolved() {
        let track = Track::new("Song", "https://youtu.be/abc", "thumb.jpg");
        assert!(!track.is_resolved());
        assert!(!track.needs_lookup());
    }

    #[test]
    fn local_file_is_set_once() {
        let mut track = Track::new("Song", "https://youtu.be/abc", "thumb.jpg");
        track.set_local_file("song_1.mp3");
        track.set_local_file("song_2.mp3");
        assert_eq!(track.local_file.as_deref(), Some("song_1.mp3"));
    }

    #[test]
    fn song_track_needs_lookup() {
        let track = Track::from_song(&Song::new("Dreams", "Fleetwood Mac"));
        assert!(track.needs_lookup());
        assert_eq!(track.name, "Dreams - Fleetwood Mac");
        assert_eq!(track.thumbnail, DEFAULT_THUMBNAIL);
    }

    #[test]
    fn empty_thumbnail_falls_back() {
        let hit = SearchHit::new("Title", "https://youtu.be/x", "");
        assert_eq!(hit.thumbnail, DEFAULT_THUMBNAIL);
    }

    #[test]
    fn track_serializes_camel_case() {
        let track = Track::new("Song", "https://youtu.be/abc", "thumb.jpg");
        let json = serde_json::to_value(&track).unwrap();
        assert!(json.get("sourceUrl").is_some());
        assert!(json.get("localFile").is_some());
    }
}
