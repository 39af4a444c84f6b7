/// Application configuration
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default config file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "tunesmith.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_service")]
    pub service: ServiceSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_assistant")]
    pub assistant: AssistantSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_media_path")]
    pub media_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_resolve_timeout_secs")]
    pub resolve_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssistantSettings {
    /// Missing key means every generation falls back to the placeholder
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_assistant_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    #[serde(default = "default_media_cache_dir")]
    pub media_cache_dir: PathBuf,
}

impl AppConfig {
    /// Load from the config file and `TUNESMITH_` environment variables
    ///
    /// An explicit `path` must exist; the default file is optional.
    /// Nested keys use `__`, e.g. `TUNESMITH_SERVICE__BASE_URL`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path).required(true)),
            None => settings
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false)),
        };

        settings = settings.add_source(
            config::Environment::with_prefix("TUNESMITH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = self.service.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Invalid(
                "service.base_url is required (set TUNESMITH_SERVICE__BASE_URL)".to_string(),
            ));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "service.base_url must start with http:// or https://, got {:?}",
                url
            )));
        }
        if self.playback.resolve_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "playback.resolve_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.service.request_timeout_secs)
    }

    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_secs(self.playback.resolve_timeout_secs)
    }
}

// Default values
fn default_service() -> ServiceSettings {
    ServiceSettings {
        base_url: default_base_url(),
        request_timeout_secs: default_request_timeout_secs(),
        media_path: default_media_path(),
    }
}

fn default_base_url() -> String {
    "http://localhost:4000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_media_path() -> String {
    "/media".to_string()
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        resolve_timeout_secs: default_resolve_timeout_secs(),
    }
}

fn default_resolve_timeout_secs() -> u64 {
    15
}

fn default_assistant() -> AssistantSettings {
    AssistantSettings {
        api_key: None,
        model: default_model(),
        base_url: default_assistant_base_url(),
    }
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_assistant_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_path: default_database_path(),
        media_cache_dir: default_media_cache_dir(),
    }
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("./data"))
        .join("tunesmith")
        .join("tunesmith.db")
}

fn default_media_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("tunesmith")
        .join("media")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service: default_service(),
            playback: default_playback(),
            assistant: default_assistant(),
            storage: default_storage(),
        }
    }
}
