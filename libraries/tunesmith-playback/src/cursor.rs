//! Playlist cursor
//!
//! Position tracker over the active playlist. The track list is replaced
//! as a whole or grown at the end; existing tracks keep their place.

use tunesmith_core::{Track, TrackId};

/// Result of moving the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorStep {
    /// Cursor moved to a new track
    Moved {
        /// Track at the new index
        track: Track,
        /// Whether the track still has to be resolved before playing
        needs_resolution: bool,
    },

    /// Already at the first/last track; nothing changed
    Boundary,
}

/// Active playlist plus current index
#[derive(Debug, Clone)]
pub struct PlaylistCursor {
    tracks: Vec<Track>,
    index: Option<usize>,
}

impl Default for PlaylistCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaylistCursor {
    /// Create a cursor with no active playlist
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            index: None,
        }
    }

    /// Replace the active playlist and reset to its first track
    pub fn set_active_playlist(&mut self, tracks: Vec<Track>) {
        self.index = if tracks.is_empty() { None } else { Some(0) };
        self.tracks = tracks;
    }

    /// Add a track at the end; the index stays where it is
    ///
    /// Appending to an empty playlist selects the new track.
    pub fn append(&mut self, track: Track) {
        self.tracks.push(track);
        if self.index.is_none() {
            self.index = Some(0);
        }
    }

    /// Step forward
    pub fn next(&mut self) -> CursorStep {
        match self.index {
            Some(index) if index + 1 < self.tracks.len() => self.move_to(index + 1),
            _ => CursorStep::Boundary,
        }
    }

    /// Step back
    pub fn previous(&mut self) -> CursorStep {
        match self.index {
            Some(index) if index > 0 => self.move_to(index - 1),
            _ => CursorStep::Boundary,
        }
    }

    /// Jump to `index`; out-of-range indices leave the cursor untouched
    pub fn select(&mut self, index: usize) -> Option<CursorStep> {
        (index < self.tracks.len()).then(|| self.move_to(index))
    }

    fn move_to(&mut self, index: usize) -> CursorStep {
        self.index = Some(index);
        let track = self.tracks[index].clone();
        CursorStep::Moved {
            needs_resolution: !track.is_resolved(),
            track,
        }
    }

    /// Current index, `-1` when nothing is selected
    pub fn cursor_index(&self) -> isize {
        self.index.map_or(-1, |i| i as isize)
    }

    /// Track under the cursor
    pub fn current(&self) -> Option<&Track> {
        self.index.and_then(|i| self.tracks.get(i))
    }

    /// Whether `id` is the track under the cursor
    pub fn is_current(&self, id: &TrackId) -> bool {
        self.current().is_some_and(|t| &t.id == id)
    }

    /// Whether [`next`](Self::next) would move
    pub fn has_next(&self) -> bool {
        self.index.is_some_and(|i| i + 1 < self.tracks.len())
    }

    /// Whether [`previous`](Self::previous) would move
    pub fn has_previous(&self) -> bool {
        self.index.is_some_and(|i| i > 0)
    }

    /// Record a resolved file on tracks sharing `source_url`
    pub fn backfill(&mut self, source_url: &str, local_file: &str) -> usize {
        let mut updated = 0;
        for track in self
            .tracks
            .iter_mut()
            .filter(|t| !t.source_url.is_empty() && t.source_url == source_url && !t.is_resolved())
        {
            track.set_local_file(local_file);
            updated += 1;
        }
        updated
    }

    /// Fill in the source URL found by searching for a track's name
    pub fn set_source_url(&mut self, id: &TrackId, source_url: &str) {
        if let Some(track) = self.tracks.iter_mut().find(|t| &t.id == id) {
            if track.source_url.is_empty() {
                track.source_url = source_url.to_string();
            }
        }
    }

    /// Tracks of the active playlist
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether there is no active playlist
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunesmith_core::Song;

    fn playlist(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| Track::from_song(&Song::new(format!("Song {}", i), "Artist")))
            .collect()
    }

    #[test]
    fn new_cursor_selects_nothing() {
        let cursor = PlaylistCursor::new();
        assert_eq!(cursor.cursor_index(), -1);
        assert!(!cursor.has_next());
        assert!(!cursor.has_previous());
    }

    #[test]
    fn set_playlist_resets_to_start() {
        let mut cursor = PlaylistCursor::new();
        cursor.set_active_playlist(playlist(3));
        cursor.next();
        cursor.set_active_playlist(playlist(2));
        assert_eq!(cursor.cursor_index(), 0);
    }

    #[test]
    fn empty_playlist_selects_nothing() {
        let mut cursor = PlaylistCursor::new();
        cursor.set_active_playlist(Vec::new());
        assert_eq!(cursor.cursor_index(), -1);
        assert_eq!(cursor.next(), CursorStep::Boundary);
    }

    #[test]
    fn next_stops_at_end() {
        let mut cursor = PlaylistCursor::new();
        let tracks = playlist(2);
        cursor.set_active_playlist(tracks.clone());

        assert_eq!(
            cursor.next(),
            CursorStep::Moved {
                track: tracks[1].clone(),
                needs_resolution: true
            }
        );
        assert_eq!(cursor.next(), CursorStep::Boundary);
        assert_eq!(cursor.cursor_index(), 1);
    }

    #[test]
    fn previous_stops_at_start() {
        let mut cursor = PlaylistCursor::new();
        cursor.set_active_playlist(playlist(2));
        assert_eq!(cursor.previous(), CursorStep::Boundary);
        assert_eq!(cursor.cursor_index(), 0);
    }

    #[test]
    fn resolved_track_skips_resolution() {
        let mut cursor = PlaylistCursor::new();
        let mut tracks = playlist(2);
        tracks[1].set_local_file("one.mp3");
        cursor.set_active_playlist(tracks);

        match cursor.next() {
            CursorStep::Moved {
                needs_resolution, ..
            } => assert!(!needs_resolution),
            CursorStep::Boundary => panic!("expected a move"),
        }
    }

    #[test]
    fn select_out_of_range() {
        let mut cursor = PlaylistCursor::new();
        cursor.set_active_playlist(playlist(2));
        assert!(cursor.select(2).is_none());
        assert_eq!(cursor.cursor_index(), 0);
        assert!(cursor.select(1).is_some());
        assert_eq!(cursor.cursor_index(), 1);
    }

    #[test]
    fn append_keeps_position_and_tracks() {
        let mut cursor = PlaylistCursor::new();
        let mut tracks = playlist(3);
        tracks[0].set_local_file("zero.mp3");
        cursor.set_active_playlist(tracks.clone());
        cursor.select(2);

        cursor.append(Track::from_song(&Song::new("Added", "Artist")));

        assert_eq!(cursor.cursor_index(), 2);
        assert_eq!(cursor.len(), 4);
        assert_eq!(&cursor.tracks()[..3], &tracks[..]);
        assert!(cursor.has_next());
    }

    #[test]
    fn append_to_empty_selects_first() {
        let mut cursor = PlaylistCursor::new();
        cursor.append(Track::from_song(&Song::new("Only", "Artist")));
        assert_eq!(cursor.cursor_index(), 0);
    }

    #[test]
    fn source_url_then_backfill() {
        let mut cursor = PlaylistCursor::new();
        let tracks = playlist(1);
        let id = tracks[0].id.clone();
        cursor.set_active_playlist(tracks);

        cursor.set_source_url(&id, "https://youtu.be/x");
        assert_eq!(cursor.backfill("https://youtu.be/x", "x.mp3"), 1);
        assert!(cursor.current().is_some_and(|t| t.is_resolved()));
    }
}
