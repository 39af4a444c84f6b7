//! Playlist library integration tests
//!
//! Databases are real SQLite files in a temporary directory.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tunesmith_core::{CoreError, KeyValueStore, Playlist, PlaylistId, Song};
use tunesmith_storage::{MemoryStore, PlaylistLibrary, SqliteStore, PLAYLISTS_KEY};

/// Test database wrapper that cleans up on drop
struct TestDb {
    dir: TempDir,
}

impl TestDb {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    async fn store(&self) -> Arc<SqliteStore> {
        let path = self.dir.path().join("data").join("tunesmith.db");
        Arc::new(SqliteStore::open(&path).await.expect("Failed to open store"))
    }
}

/// Store whose reads and writes can be switched off
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    broken: AtomicBool,
}

impl FlakyStore {
    fn broken() -> Self {
        let store = Self::default();
        store.broken.store(true, Ordering::SeqCst);
        store
    }

    fn check(&self) -> tunesmith_core::Result<()> {
        if self.broken.load(Ordering::SeqCst) {
            Err(CoreError::storage("disk full"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> tunesmith_core::Result<Option<String>> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &str) -> tunesmith_core::Result<()> {
        self.check()?;
        self.inner.put(key, value).await
    }

    async fn remove(&self, key: &str) -> tunesmith_core::Result<()> {
        self.check()?;
        self.inner.remove(key).await
    }
}

fn create_test_playlist(name: &str) -> Playlist {
    Playlist::new(
        name,
        vec![
            Song::new("Blue in Green", "Miles Davis"),
            Song::new("Naima", "John Coltrane"),
        ],
    )
}

#[tokio::test]
async fn test_library_survives_reload() {
    let db = TestDb::new();

    let first_id = {
        let mut library = PlaylistLibrary::load(db.store().await).await;
        let first = library.add(create_test_playlist("Jazz")).await;
        library.add(create_test_playlist("More Jazz")).await;
        library.set_active(&first).await.unwrap();
        first
    };

    let library = PlaylistLibrary::load(db.store().await).await;

    assert!(library.is_persistent());
    assert_eq!(library.len(), 2);
    assert_eq!(library.playlists()[0].name, "More Jazz");
    assert_eq!(library.playlists()[1].name, "Jazz");
    assert_eq!(library.active().map(|p| &p.id), Some(&first_id));
}

#[tokio::test]
async fn test_newest_first() {
    let mut library = PlaylistLibrary::load(Arc::new(MemoryStore::new())).await;

    library.add(create_test_playlist("Old")).await;
    library.add(create_test_playlist("New")).await;

    assert_eq!(library.at(0).unwrap().name, "New");
    assert_eq!(library.at(1).unwrap().name, "Old");
}

#[tokio::test]
async fn test_append_song_persists() {
    let db = TestDb::new();
    let store = db.store().await;

    let mut library = PlaylistLibrary::load(store.clone()).await;
    let id = library.add(create_test_playlist("Jazz")).await;
    library
        .append_song(&id, Song::new("So What", "Miles Davis"))
        .await
        .unwrap();

    let reloaded = PlaylistLibrary::load(store).await;
    let playlist = reloaded.get(&id).unwrap();
    assert_eq!(playlist.len(), 3);
    assert_eq!(playlist.songs[2], Song::new("So What", "Miles Davis"));
}

#[tokio::test]
async fn test_append_to_unknown_playlist() {
    let mut library = PlaylistLibrary::load(Arc::new(MemoryStore::new())).await;

    let result = library
        .append_song(&PlaylistId::new("missing"), Song::new("A", "B"))
        .await;

    assert!(matches!(result, Err(CoreError::PlaylistNotFound(_))));
}

#[tokio::test]
async fn test_delete_active_clears_selection() {
    let store = Arc::new(MemoryStore::new());
    let mut library = PlaylistLibrary::load(store.clone()).await;
    let id = library.add(create_test_playlist("Jazz")).await;
    library.set_active(&id).await.unwrap();

    let removed = library.delete(&id).await.unwrap();

    assert_eq!(removed.name, "Jazz");
    assert!(library.is_empty());
    assert!(library.active().is_none());
    assert!(store.get("activePlaylist").await.unwrap().is_none());
    assert_eq!(store.get(PLAYLISTS_KEY).await.unwrap().as_deref(), Some("[]"));
}

#[tokio::test]
async fn test_set_active_unknown() {
    let mut library = PlaylistLibrary::load(Arc::new(MemoryStore::new())).await;
    let result = library.set_active(&PlaylistId::new("nope")).await;
    assert!(matches!(result, Err(CoreError::PlaylistNotFound(_))));
}

#[tokio::test]
async fn test_import_csv() {
    let mut library = PlaylistLibrary::load(Arc::new(MemoryStore::new())).await;
    let csv = "Song Title,Artist\n\"Blue in Green\",\"Miles Davis\"";

    let id = library.import_csv("  ", csv).await.unwrap();

    let playlist = library.get(&id).unwrap();
    assert_eq!(playlist.name, "Imported playlist");
    assert_eq!(playlist.songs, vec![Song::new("Blue in Green", "Miles Davis")]);
}

#[tokio::test]
async fn test_unavailable_store_is_tolerated() {
    let mut library = PlaylistLibrary::load(Arc::new(FlakyStore::broken())).await;

    assert!(!library.is_persistent());
    assert!(library.is_empty());

    // Mutations still work in memory
    let id = library.add(create_test_playlist("Jazz")).await;
    library.set_active(&id).await.unwrap();
    library
        .append_song(&id, Song::new("So What", "Miles Davis"))
        .await
        .unwrap();

    assert_eq!(library.active().unwrap().len(), 3);
}

#[tokio::test]
async fn test_write_failure_degrades() {
    let store = Arc::new(FlakyStore::default());
    let mut library = PlaylistLibrary::load(store.clone()).await;
    assert!(library.is_persistent());

    store.broken.store(true, Ordering::SeqCst);
    library.add(create_test_playlist("Jazz")).await;

    assert!(!library.is_persistent());
    assert_eq!(library.len(), 1);
}

#[tokio::test]
async fn test_corrupt_data_starts_empty() {
    let store = Arc::new(MemoryStore::new());
    store.put(PLAYLISTS_KEY, "{not json").await.unwrap();

    let library = PlaylistLibrary::load(store).await;

    assert!(library.is_empty());
    assert!(library.is_persistent());
}

#[tokio::test]
async fn test_legacy_timestamp_field() {
    let store = Arc::new(MemoryStore::new());
    store
        .put(
            PLAYLISTS_KEY,
            r#"[{"id":"1700000000000","name":"Old","songs":[{"title":"A","artist":"B"}],"timestamp":"2023-11-14"}]"#,
        )
        .await
        .unwrap();

    let library = PlaylistLibrary::load(store).await;

    assert_eq!(library.len(), 1);
    assert_eq!(library.at(0).unwrap().created_date, "2023-11-14");
}
