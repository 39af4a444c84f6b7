//! Media service client.

use crate::error::{ClientError, Result};
use crate::source_url::is_valid_source_url;
use crate::types::{
    DownloadProgress, ErrorResponse, ResolveRequest, ResolveResponse, SearchRequest,
    SearchResponse, ServiceConfig,
};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, Response};
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use tunesmith_core::{MediaService, ResolvedMedia, SearchHit};

/// Client for the search/resolve/media service.
///
/// # Example
///
/// ```ignore
/// use tunesmith_client::{MediaServiceClient, ServiceConfig};
///
/// let client = MediaServiceClient::new(ServiceConfig::new("http://localhost:4000"))?;
///
/// let hits = client.search("lofi beats").await?;
/// if let Some(hit) = hits.first() {
///     let media = client.resolve(&hit.source_url).await?;
///     println!("Stream from {}", client.media_url(&media.local_file));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MediaServiceClient {
    http: Client,
    base_url: String,
    media_path: String,
}

impl MediaServiceClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let media_path = format!("/{}", config.media_path.trim_matches('/'));

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Tunesmith/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            media_path,
        })
    }

    /// Get the service URL.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Search for videos matching `query`.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let url = format!("{}/search", self.base_url);
        debug!(url = %url, query, "Searching");

        let response = self
            .http
            .post(&url)
            .json(&SearchRequest::new(query))
            .send()
            .await
            .map_err(map_send_error)?;
        let response = check_status(response).await?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse search results: {}", e)))?;
        let hits = body.into_hits();

        info!(query, results = hits.len(), "Search completed");
        Ok(hits)
    }

    /// Ask the service to download the audio behind `source_url`.
    pub async fn resolve(&self, source_url: &str) -> Result<ResolvedMedia> {
        if !is_valid_source_url(source_url) {
            return Err(ClientError::InvalidSourceUrl(source_url.to_string()));
        }

        let url = format!("{}/resolve", self.base_url);
        debug!(url = %url, source_url, "Resolving");

        let response = self
            .http
            .post(&url)
            .json(&ResolveRequest::new(source_url))
            .send()
            .await
            .map_err(map_send_error)?;
        let response = check_status(response).await?;

        let body: ResolveResponse = response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse resolve response: {}", e)))?;

        info!(
            source_url,
            local_file = %body.local_file,
            size = ?body.size,
            "Media resolved"
        );
        Ok(body.into())
    }

    /// URL a resolved file is served from.
    pub fn media_url(&self, local_file: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            self.media_path,
            local_file.trim_start_matches('/')
        )
    }

    /// Download a resolved file to `dest_path`.
    ///
    /// # Arguments
    /// * `local_file` - File reference returned by [`resolve`](Self::resolve)
    /// * `dest_path` - Where to save the file
    /// * `progress_callback` - Called for each received chunk
    pub async fn download_media<F>(
        &self,
        local_file: &str,
        dest_path: &Path,
        progress_callback: F,
    ) -> Result<u64>
    where
        F: FnMut(DownloadProgress),
    {
        let url = self.media_url(local_file);
        self.download(&url, dest_path, progress_callback).await
    }

    /// Download any media URL served by the service to `dest_path`.
    pub async fn download<F>(
        &self,
        url: &str,
        dest_path: &Path,
        mut progress_callback: F,
    ) -> Result<u64>
    where
        F: FnMut(DownloadProgress),
    {
        debug!(url = %url, dest = %dest_path.display(), "Downloading media");

        let response = self.http.get(url).send().await.map_err(map_send_error)?;
        let response = check_status(response).await?;
        let total_size = response.content_length();

        if let Some(parent) = dest_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = File::create(dest_path).await?;
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            let progress = total_size
                .filter(|total| *total > 0)
                .map(|total| downloaded as f32 / total as f32)
                .unwrap_or(0.0);

            progress_callback(DownloadProgress {
                bytes_received: downloaded,
                bytes_total: total_size,
                progress,
            });
        }

        file.flush().await?;

        info!(
            url,
            dest = %dest_path.display(),
            size = downloaded,
            "Media downloaded"
        );
        Ok(downloaded)
    }
}

fn map_send_error(e: reqwest::Error) -> ClientError {
    if e.is_connect() || e.is_timeout() {
        ClientError::ServiceUnreachable(e.to_string())
    } else {
        ClientError::Request(e)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status.as_u16() == 429 {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);
        warn!(retry_after, "Rate limited by media service");
        return Err(ClientError::RateLimited {
            retry_after_secs: retry_after,
        });
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .ok()
        .and_then(|body| body.describe())
        .unwrap_or(text);

    Err(ClientError::Service {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl MediaService for MediaServiceClient {
    async fn search(&self, query: &str) -> tunesmith_core::Result<Vec<SearchHit>> {
        Ok(MediaServiceClient::search(self, query).await?)
    }

    async fn resolve(&self, source_url: &str) -> tunesmith_core::Result<ResolvedMedia> {
        Ok(MediaServiceClient::resolve(self, source_url).await?)
    }

    fn media_url(&self, local_file: &str) -> String {
        MediaServiceClient::media_url(self, local_file)
    }
}
