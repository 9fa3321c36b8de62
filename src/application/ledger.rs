use crate::domain::outcome::PaymentOutcome;
use crate::domain::path::StoragePath;
use crate::domain::ports::StorageHandle;
use crate::domain::record::{LedgerKey, TransactionRecord};
use crate::error::{RecorderError, Result};

/// Appends outcomes to the transaction ledger.
///
/// Successes are keyed by transaction id, so a duplicate callback for the
/// same payment overwrites its own slot. Failures get a random key each time.
/// One write per outcome, no retries.
#[derive(Clone)]
pub struct LedgerWriter {
    storage: StorageHandle,
    root: String,
}

impl LedgerWriter {
    pub fn new(storage: StorageHandle, root: impl Into<String>) -> Self {
        Self {
            storage,
            root: root.into(),
        }
    }

    /// Where `outcome` will be written. Failures draw a new key on every call.
    pub fn path_for(&self, outcome: &PaymentOutcome) -> Result<StoragePath> {
        let key = LedgerKey::for_outcome(outcome);
        StoragePath::ledger_entry(&self.root, &outcome.user_id, key.as_str())
    }

    /// Writes `outcome` at `path`.
    pub async fn write(&self, path: &StoragePath, outcome: &PaymentOutcome) -> Result<()> {
        let record = TransactionRecord::from(outcome);
        let value = serde_json::to_value(&record)?;
        self.storage
            .write(path, value)
            .await
            .map_err(RecorderError::into_storage_write)
    }
}
