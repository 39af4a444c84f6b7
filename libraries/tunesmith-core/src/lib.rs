//! Tunesmith Core
//!
//! Platform-agnostic domain types, service traits and error handling shared
//! by every Tunesmith crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Song`, `Playlist`, `SearchHit` and their ids
//! - **Service Traits**: `MediaService` (search/resolve backend) and
//!   `KeyValueStore` (persistent blobs)
//! - **Export Formats**: CSV export/import and plain-text sharing
//! - **Error Handling**: `CoreError` plus the user-facing `ErrorKind`
//!
//! # Example
//!
//! ```rust
//! use tunesmith_core::{export, Playlist, Song};
//!
//! let playlist = Playlist::new(
//!     "Rainy Day",
//!     vec![Song::new("Riders on the Storm", "The Doors")],
//! );
//!
//! let csv = export::to_csv(&playlist);
//! assert!(csv.starts_with("Song Title,Artist"));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod export;
pub mod traits;
pub mod types;

pub use error::{CoreError, ErrorKind, Result};
pub use traits::{KeyValueStore, MediaService};
pub use types::{
    Playlist, PlaylistId, ResolvedMedia, SearchHit, Song, Track, TrackId, DEFAULT_THUMBNAIL,
};
