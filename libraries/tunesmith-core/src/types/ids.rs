/// ID types for Tunesmith entities
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Track identifier
///
/// Synthetic and stable: assigned once when a track is created from a search
/// hit or a saved song, and carried through resolution. Display names are not
/// unique, so every structure that needs identity keys on this instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a track ID from an existing value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random track ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Last issued playlist timestamp, in milliseconds
static LAST_PLAYLIST_MILLIS: AtomicU64 = AtomicU64::new(0);

/// Playlist identifier
///
/// Timestamp-derived (milliseconds since the Unix epoch). Two playlists
/// created within the same millisecond get consecutive values, so ids are
/// strictly increasing for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(String);

impl PlaylistId {
    /// Create a playlist ID from an existing value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate the next playlist ID from the current time
    pub fn generate() -> Self {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let mut previous = LAST_PLAYLIST_MILLIS.load(Ordering::Relaxed);
        loop {
            let next = now.max(previous + 1);
            match LAST_PLAYLIST_MILLIS.compare_exchange_weak(
                previous,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Self(next.to_string()),
                Err(actual) => previous = actual,
            }
        }
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_ids_are_unique() {
        assert_ne!(TrackId::generate(), TrackId::generate());
    }

    #[test]
    fn playlist_ids_strictly_increase() {
        let ids: Vec<u64> = (0..100)
            .map(|_| PlaylistId::generate().as_str().parse().unwrap())
            .collect();

        for pair in ids.windows(2) {
            assert!(pair[1] > pair[0], "{} !> {}", pair[1], pair[0]);
        }
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = PlaylistId::new("1700000000000");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1700000000000\"");
    }
}
