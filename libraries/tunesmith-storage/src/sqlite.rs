//! `SQLite` key-value store

use crate::error::Result;
use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;
use tunesmith_core::KeyValueStore;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Key-value store backed by a single `kv` table
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `database_url` (e.g. `sqlite://tunesmith.db`) and run migrations
    ///
    /// The database file is created if missing.
    pub async fn connect(database_url: &str) -> Result<Self> {
        debug!(url = %database_url, "Creating SQLite pool");

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Open the database file at `path`, creating parent directories
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Self::connect(&format!("sqlite://{}", path.display())).await
    }

    /// Private in-memory database
    ///
    /// Held on one connection that never expires, so the data lives as long
    /// as the store.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        MIGRATOR.run(&pool).await?;
        debug!("SQLite store ready");
        Ok(Self { pool })
    }

    /// Underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn fetch(&self, key: &str) -> Result<Option<String>> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn upsert(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO kv (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                            updated_at = strftime('%s', 'now')",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> tunesmith_core::Result<Option<String>> {
        Ok(self.fetch(key).await?)
    }

    async fn put(&self, key: &str, value: &str) -> tunesmith_core::Result<()> {
        Ok(self.upsert(key, value).await?)
    }

    async fn remove(&self, key: &str) -> tunesmith_core::Result<()> {
        Ok(self.delete(key).await?)
    }
}
