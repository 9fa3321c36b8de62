use super::path::StoragePath;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Hierarchical key-value store holding the ledger and the carts.
///
/// Writes are last-write-wins per path; there are no multi-key transactions.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn write(&self, path: &StoragePath, value: Value) -> Result<()>;
    /// Removes `path` and everything nested under it. Absent paths are not an error.
    async fn clear(&self, path: &StoragePath) -> Result<()>;
    async fn read(&self, path: &StoragePath) -> Result<Option<Value>>;
    /// Every entry at or below `prefix`, ordered by path.
    async fn scan(&self, prefix: &StoragePath) -> Result<Vec<(String, Value)>>;
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, or `None` when there is no session.
    async fn current_user_id(&self) -> Result<Option<String>>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, event_name: &str, payload: Map<String, Value>) -> Result<()>;
}

pub type StorageHandle = Arc<dyn Storage>;
pub type IdentityHandle = Arc<dyn IdentityProvider>;
pub type NotifierHandle = Arc<dyn Notifier>;
