use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::data::{fallback_games, fallback_movies, fallback_videos};
use crate::source::{Fetcher, GAMES_PATH, MOVIES_PATH, VIDEOS_PATH};
use crate::storage::{Storage, OPENED_BEFORE_KEY, VIDEOS_KEY};
use crate::types::{AddVideoResult, GameRecord, MovieRecord, VideoRecord};

/// Data access shared by the three mini-apps.
///
/// Getters never fail: fetch problems are logged and the built-in records are
/// returned instead. Videos are fetched at most once per storage lifetime and
/// served from `storage` afterwards.
pub struct DataAccess {
    fetcher: Arc<dyn Fetcher>,
    storage: Arc<dyn Storage>,
    // serializes the read-modify-write paths on the video keys
    videos_lock: Mutex<()>,
}

impl DataAccess {
    pub fn new(fetcher: Arc<dyn Fetcher>, storage: Arc<dyn Storage>) -> Self {
        Self { fetcher, storage, videos_lock: Mutex::new(()) }
    }

    /// Forget everything persisted, returning the video cache to its first-run state.
    pub async fn clear_storage(&self) -> Result<u64> {
        let _guard = self.videos_lock.lock().await;
        self.storage.clear(None).await
    }

    pub async fn get_all_games(&self) -> Vec<GameRecord> {
        match self.fetch_list(GAMES_PATH).await {
            Ok(games) => games,
            Err(e) => {
                error!(path = GAMES_PATH, "error fetching games, using built-in list: {e:#}");
                fallback_games()
            }
        }
    }

    pub async fn get_movies(&self) -> Vec<MovieRecord> {
        match self.fetch_list(MOVIES_PATH).await {
            Ok(movies) => movies,
            Err(e) => {
                error!(path = MOVIES_PATH, "error fetching movies, using built-in list: {e:#}");
                fallback_movies()
            }
        }
    }

    pub async fn get_videos(&self) -> Vec<VideoRecord> {
        let _guard = self.videos_lock.lock().await;

        match self.stored_videos().await {
            Ok(Some(videos)) => {
                debug!(count = videos.len(), "serving videos from local store");
                return videos;
            }
            Ok(None) => {}
            Err(e) => warn!("local video store unreadable, fetching instead: {e:#}"),
        }

        let videos = match self.fetch_list(VIDEOS_PATH).await {
            Ok(videos) => videos,
            Err(e) => {
                error!(path = VIDEOS_PATH, "error fetching videos, using built-in list: {e:#}");
                fallback_videos()
            }
        };

        // Still hand the list back if it could not be stored; the next call fetches again.
        if let Err(e) = self.store_videos(&videos).await {
            error!("failed to persist videos: {e:#}");
        }
        videos
    }

    /// Append a video to the local store, marking the store as initialized.
    pub async fn add_video(&self, record: VideoRecord) -> AddVideoResult {
        let _guard = self.videos_lock.lock().await;
        debug!(id = %record.id, platform = %record.platform, "adding video");
        match self.append_video(record).await {
            Ok(count) => {
                debug!(count, "video added");
                AddVideoResult::ok()
            }
            Err(e) => {
                error!("failed to add video: {e:#}");
                AddVideoResult::failed(format!("{e:#}"))
            }
        }
    }

    async fn fetch_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let body = self.fetcher.fetch(path).await?;
        let list: Vec<T> = serde_json::from_str(&body).with_context(|| format!("parsing {path}"))?;
        debug!(path, count = list.len(), "fetched");
        Ok(list)
    }

    /// Persisted videos, if the store has been initialized and still holds them.
    async fn stored_videos(&self) -> Result<Option<Vec<VideoRecord>>> {
        if self.storage.get(OPENED_BEFORE_KEY).await?.as_deref() != Some("true") {
            return Ok(None);
        }
        let Some(payload) = self.storage.get(VIDEOS_KEY).await? else { return Ok(None) };
        let videos = serde_json::from_str(&payload).context("parsing persisted videos")?;
        Ok(Some(videos))
    }

    async fn store_videos(&self, videos: &[VideoRecord]) -> Result<()> {
        let payload = serde_json::to_string(videos)?;
        self.storage.put_all(&[(VIDEOS_KEY, payload.as_str()), (OPENED_BEFORE_KEY, "true")]).await
    }

    async fn append_video(&self, record: VideoRecord) -> Result<usize> {
        // A corrupt list is reported rather than overwritten
        let mut videos: Vec<VideoRecord> = match self.storage.get(VIDEOS_KEY).await? {
            Some(payload) => serde_json::from_str(&payload).context("parsing persisted videos")?,
            None => Vec::new(),
        };
        videos.push(record);
        self.store_videos(&videos).await?;
        Ok(videos.len())
    }
}
