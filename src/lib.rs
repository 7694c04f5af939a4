pub mod api;
pub mod config;
pub mod data;
pub mod db;
pub mod source;
pub mod storage;
pub mod types;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::api::DataAccess;
    pub use crate::config::HubConfig;
    pub use crate::storage::{MemoryStorage, Storage};
    pub use crate::source::{Fetcher, HttpFetcher};
    pub use crate::types::{AddVideoResult, GameRecord, MovieRecord, VideoRecord};
    pub use crate::Hub;
}

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::api::DataAccess;
use crate::config::HubConfig;
use crate::db::Database;
use crate::source::HttpFetcher;
use crate::types::{AddVideoResult, GameRecord, MovieRecord, VideoRecord};

/// Async library entry point. Owns the database and the data access layer
/// the three mini-apps read from.
pub struct Hub {
    db: Database,
    data: DataAccess,
}

impl Hub {
    /// Connect the database, (optionally) run migrations and point the fetcher at `config.base_url`.
    pub async fn connect(config: &HubConfig) -> Result<Self> {
        let db = Database::connect(config.database_url.as_deref()).await?;
        if config.run_migrations { db.run_migrations().await?; }
        let fetcher = HttpFetcher::new(config.base_url.clone(), config.request_timeout)?;
        info!(base_url = %config.base_url, "hub ready");
        let data = DataAccess::new(Arc::new(fetcher), Arc::new(db.clone()));
        Ok(Self { db, data })
    }

    pub fn database(&self) -> &Database { &self.db }

    /// Games for the comparison view.
    pub async fn get_all_games(&self) -> Vec<GameRecord> { self.data.get_all_games().await }

    /// Movies for the guessing game.
    pub async fn get_movies(&self) -> Vec<MovieRecord> { self.data.get_movies().await }

    /// Videos for the watcher, served locally after the first call.
    pub async fn get_videos(&self) -> Vec<VideoRecord> { self.data.get_videos().await }

    pub async fn add_video(&self, record: VideoRecord) -> AddVideoResult { self.data.add_video(record).await }

    /// Drop every persisted key. The next `get_videos` fetches again.
    pub async fn clear_storage(&self) -> Result<u64> {
        let removed = self.data.clear_storage().await?;
        info!(removed, "local storage cleared");
        Ok(removed)
    }

    pub async fn vacuum_db(&self) -> Result<()> { self.db.vacuum().await }
}
