use crate::domain::path::StoragePath;
use crate::domain::ports::Storage;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory key-value store addressed by storage paths.
///
/// Uses `Arc<RwLock<BTreeMap<String, Value>>>` so clones share state and
/// prefix scans come back in path order. Ideal for testing or local replays
/// where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    entries: Arc<RwLock<BTreeMap<String, Value>>>,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored exactly at `path`, if any.
    pub async fn get(&self, path: &str) -> Option<Value> {
        self.entries.read().await.get(path).cloned()
    }

    /// Number of stored entries at or below `prefix`.
    pub async fn count_under(&self, prefix: &str) -> usize {
        let entries = self.entries.read().await;
        entries
            .keys()
            .filter(|k| *k == prefix || k.starts_with(&format!("{prefix}/")))
            .count()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl Storage for InMemoryStore {
    async fn write(&self, path: &StoragePath, value: Value) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(path.as_str().to_string(), value);
        Ok(())
    }

    async fn clear(&self, path: &StoragePath) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.retain(|key, _| !path.contains(key));
        Ok(())
    }

    async fn read(&self, path: &StoragePath) -> Result<Option<Value>> {
        Ok(self.get(path.as_str()).await)
    }

    async fn scan(&self, prefix: &StoragePath) -> Result<Vec<(String, Value)>> {
        let entries = self.entries.read().await;
        Ok(entries
            .range(prefix.as_str().to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix.as_str()))
            .filter(|(key, _)| prefix.contains(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}
