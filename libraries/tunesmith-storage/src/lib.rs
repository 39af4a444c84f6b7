//! Tunesmith Storage
//!
//! Persistent key-value storage and the saved playlist library.
//!
//! # Architecture
//!
//! - **Stores**: [`SqliteStore`] (a `kv` table managed with embedded
//!   migrations) and [`MemoryStore`], both implementing
//!   [`tunesmith_core::KeyValueStore`]
//! - **Library**: [`PlaylistLibrary`] keeps playlists newest first plus the
//!   active playlist, writing through on every change
//!
//! Values are the JSON shapes of the core types, stored under the keys
//! `playlists` and `activePlaylist`.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tunesmith_core::{Playlist, Song};
//! use tunesmith_storage::{PlaylistLibrary, SqliteStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::connect("sqlite://tunesmith.db").await?;
//! let mut library = PlaylistLibrary::load(Arc::new(store)).await;
//!
//! library
//!     .add(Playlist::new("Focus", vec![Song::new("Weightless", "Marconi Union")]))
//!     .await;
//! # Ok(())
//! # }
//! ```

mod error;
mod library;
mod memory;
mod sqlite;

pub use error::{Result, StorageError};
pub use library::{PlaylistLibrary, ACTIVE_PLAYLIST_KEY, PLAYLISTS_KEY};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
