//! On-disk cache of downloaded media.
//!
//! Each download goes to its own temporary file in the cache directory and
//! is renamed into place only once complete, so overlapping downloads of
//! the same media never share a partial file.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use tunesmith_client::MediaServiceClient;

use super::error::{OutputError, Result};

#[derive(Debug, Clone)]
pub(super) struct MediaCache {
    dir: PathBuf,
}

impl MediaCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn create(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir).map_err(|source| OutputError::Cache {
            path: dir.clone(),
            source,
        })?;
        Ok(Self::new(dir))
    }

    /// Where `media_url` lives once downloaded
    pub fn path_for(&self, media_url: &str) -> PathBuf {
        self.dir.join(cache_file_name(media_url))
    }

    /// Cached file for `media_url`, if a complete one exists
    pub fn cached(&self, media_url: &str) -> Option<PathBuf> {
        let path = self.path_for(media_url);
        path.is_file().then_some(path)
    }

    /// Download `media_url` into the cache and return its final path
    pub async fn fetch(&self, client: &MediaServiceClient, media_url: &str) -> Result<PathBuf> {
        let path = self.path_for(media_url);
        let partial = tempfile::Builder::new()
            .prefix(".download-")
            .suffix(".part")
            .tempfile_in(&self.dir)
            .map_err(|source| self.cache_error(source))?;

        // The temporary file is removed on drop if anything below fails
        let size = client.download(media_url, partial.path(), |_| {}).await?;
        partial
            .persist(&path)
            .map_err(|e| self.cache_error(e.error))?;

        debug!(path = %path.display(), size, "Media cached");
        Ok(path)
    }

    /// Drop a cached file that turned out to be unusable
    pub fn evict(&self, path: &Path) {
        match std::fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "Evicted cached media"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to evict cached media"),
        }
    }

    fn cache_error(&self, source: std::io::Error) -> OutputError {
        OutputError::Cache {
            path: self.dir.clone(),
            source,
        }
    }
}

/// Cache file name for a media URL: its last path segment.
fn cache_file_name(media_url: &str) -> String {
    let path = media_url.split(['?', '#']).next().unwrap_or(media_url);
    let name = path.rsplit('/').next().unwrap_or_default();
    if name.is_empty() {
        "media".to_string()
    } else {
        name.to_string()
    }
}
