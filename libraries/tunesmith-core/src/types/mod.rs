mod ids;
mod playlist;
mod track;

pub use ids::{PlaylistId, TrackId};
pub use playlist::{Playlist, Song};
pub use track::{ResolvedMedia, SearchHit, Track, DEFAULT_THUMBNAIL};
