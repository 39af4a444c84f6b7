//! Types for media service requests and responses.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tunesmith_core::{ResolvedMedia, SearchHit};

/// Configuration for connecting to the media service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL of the service (e.g., "http://localhost:4000")
    pub url: String,
    /// Whole-request timeout
    pub timeout: Duration,
    /// Path prefix resolved files are served under
    pub media_path: String,
}

impl ServiceConfig {
    /// Create a config with default timeout and media path.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(30),
            media_path: "/media".to_string(),
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the media path prefix.
    pub fn with_media_path(mut self, media_path: impl Into<String>) -> Self {
        self.media_path = media_path.into();
        self
    }
}

// =============================================================================
// Search
// =============================================================================

/// Request body for the search endpoint.
///
/// The query is sent under both the current and the legacy key.
#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub query_user: &'a str,
}

impl<'a> SearchRequest<'a> {
    pub fn new(query: &'a str) -> Self {
        Self {
            query,
            query_user: query,
        }
    }
}

/// Response from the search endpoint: rows of `[title, url, thumbnail]`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(alias = "output")]
    pub results: Vec<Vec<String>>,
}

impl SearchResponse {
    /// Convert rows to hits, skipping rows without a title or URL.
    pub fn into_hits(self) -> Vec<SearchHit> {
        self.results
            .into_iter()
            .filter_map(|row| {
                let mut fields = row.into_iter();
                let title = fields.next()?;
                let url = fields.next()?;
                let thumbnail = fields.next().unwrap_or_default();
                Some(SearchHit::new(title, url, thumbnail))
            })
            .collect()
    }
}

// =============================================================================
// Resolve
// =============================================================================

/// Request body for the resolve endpoint.
#[derive(Debug, Serialize)]
pub struct ResolveRequest<'a> {
    #[serde(rename = "sourceUrl")]
    pub source_url: &'a str,
    pub url: &'a str,
}

impl<'a> ResolveRequest<'a> {
    pub fn new(source_url: &'a str) -> Self {
        Self {
            source_url,
            url: source_url,
        }
    }
}

/// Response from the resolve endpoint.
#[derive(Debug, Deserialize)]
pub struct ResolveResponse {
    #[serde(rename = "localFile", alias = "file")]
    pub local_file: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<ResolveResponse> for ResolvedMedia {
    fn from(response: ResolveResponse) -> Self {
        ResolvedMedia {
            local_file: response.local_file,
            title: response.title,
            size: response.size,
        }
    }
}

/// Error body returned on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorResponse {
    /// `message: error`, or whichever is present.
    pub fn describe(&self) -> Option<String> {
        match (&self.message, &self.error) {
            (Some(m), Some(e)) => Some(format!("{}: {}", m, e)),
            (Some(m), None) => Some(m.clone()),
            (None, Some(e)) => Some(e.clone()),
            (None, None) => None,
        }
    }
}

// =============================================================================
// Download
// =============================================================================

/// Progress of a media download.
#[derive(Debug, Clone)]
pub struct DownloadProgress {
    pub bytes_received: u64,
    pub bytes_total: Option<u64>,
    /// 0.0 to 1.0, 0.0 when the size is unknown
    pub progress: f32,
}
