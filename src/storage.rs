use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Set to `"true"` once the video cache has been populated.
pub const OPENED_BEFORE_KEY: &str = "isOpenedBefore";
/// JSON array of `VideoRecord`.
pub const VIDEOS_KEY: &str = "videos";

/// String key-value persistence used by the video cache.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write every entry or none of them.
    async fn put_all(&self, entries: &[(&str, &str)]) -> Result<()>;

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        self.put_all(&[(key, value)]).await
    }

    /// Remove keys starting with `prefix`, or everything. Returns the number removed.
    async fn clear(&self, prefix: Option<&str>) -> Result<u64>;
}

/// In-process storage; contents live as long as the value.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self { Self::default() }

    pub fn with_entries<K: Into<String>, V: Into<String>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        let map = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self { entries: Mutex::new(map) }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries.lock().map_err(|_| anyhow!("memory storage lock poisoned"))
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn put_all(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut map = self.lock()?;
        for (k, v) in entries {
            map.insert((*k).to_string(), (*v).to_string());
        }
        Ok(())
    }

    async fn clear(&self, prefix: Option<&str>) -> Result<u64> {
        let mut map = self.lock()?;
        let before = map.len();
        match prefix {
            Some(p) => map.retain(|k, _| !k.starts_with(p)),
            None => map.clear(),
        }
        Ok((before - map.len()) as u64)
    }
}
