use crate::domain::path::StoragePath;
use crate::domain::ports::StorageHandle;
use crate::error::{RecorderError, Result};

/// Empties a user's cart after a successful payment.
///
/// The whole cart is cleared, whatever it holds; it is not matched against
/// the items that were paid for.
#[derive(Clone)]
pub struct CartClearer {
    storage: StorageHandle,
    root: String,
}

impl CartClearer {
    pub fn new(storage: StorageHandle, root: impl Into<String>) -> Self {
        Self {
            storage,
            root: root.into(),
        }
    }

    /// Removes every line item of `user_id`'s cart. An empty cart is left as is.
    pub async fn clear(&self, user_id: &str) -> Result<StoragePath> {
        let path = StoragePath::cart_items(&self.root, user_id)?;
        self.storage
            .clear(&path)
            .await
            .map_err(RecorderError::into_storage_write)?;
        Ok(path)
    }
}
