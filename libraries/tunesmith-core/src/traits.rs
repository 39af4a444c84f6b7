/// Core traits for Tunesmith
use crate::error::Result;
use crate::types::{ResolvedMedia, SearchHit};
use async_trait::async_trait;

/// Search/resolve backend
///
/// Implementers talk to the media service: searching for songs, fetching
/// (resolving) the audio of a watch URL, and naming the URL the resolved
/// file is served from.
#[async_trait]
pub trait MediaService: Send + Sync {
    /// Search for songs matching `query`
    ///
    /// An empty result is not an error.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>>;

    /// Download the audio behind `source_url` on the service side
    async fn resolve(&self, source_url: &str) -> Result<ResolvedMedia>;

    /// URL the resolved `local_file` can be fetched from
    fn media_url(&self, local_file: &str) -> String;
}

/// Persistent key-value blob store
///
/// Values are serialized entity shapes (JSON text).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    async fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`; deleting a missing key succeeds
    async fn remove(&self, key: &str) -> Result<()>;
}
