//! Tunesmith Media Service Client
//!
//! HTTP client for the search/resolve/media service.
//!
//! # Features
//!
//! - **Search**: `POST /search` returning `[title, url, thumbnail]` rows
//! - **Resolve**: `POST /resolve` to have the service fetch a video's audio
//! - **Media**: URL of a resolved file, and streaming download to disk
//!
//! The client implements [`tunesmith_core::MediaService`] so the playback
//! engine can use it directly.
//!
//! # Example
//!
//! ```ignore
//! use tunesmith_client::{MediaServiceClient, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MediaServiceClient::new(ServiceConfig::new("http://localhost:4000"))?;
//!
//!     for hit in client.search("lofi").await? {
//!         println!("{} ({})", hit.title, hit.source_url);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod source_url;
mod types;

pub use client::MediaServiceClient;
pub use error::{ClientError, Result};
pub use source_url::is_valid_source_url;
pub use types::{DownloadProgress, ServiceConfig};
