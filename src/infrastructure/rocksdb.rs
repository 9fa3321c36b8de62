use crate::config::RecorderConfig;
use crate::domain::path::StoragePath;
use crate::domain::ports::Storage;
use crate::error::{RecorderError, Result};
use async_trait::async_trait;
use rocksdb::{
    ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options, WriteBatch,
};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// A persistent store implementation using RocksDB.
///
/// The ledger and the carts live in separate Column Families, named after the
/// configured path roots. A path is routed to the Column Family matching its
/// first segment; the full path is the key and values are JSON.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    families: Arc<Vec<String>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures a Column Family exists for the ledger root and the cart root.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    /// * `config` - Supplies the ledger and cart root names.
    pub fn open<P: AsRef<Path>>(path: P, config: &RecorderConfig) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let families = vec![config.ledger_root.clone(), config.cart_root.clone()];
        let descriptors = families
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()));

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            families: Arc::new(families),
        })
    }

    fn family(&self, path: &StoragePath) -> Result<&ColumnFamily> {
        let root = path.segments().next().unwrap_or_default();
        if !self.families.iter().any(|f| f == root) {
            return Err(RecorderError::StorageWrite(format!(
                "no column family for path root {root:?}"
            )));
        }
        self.db.cf_handle(root).ok_or_else(|| {
            RecorderError::InternalError(Box::new(std::io::Error::other(format!(
                "{root} column family not found"
            ))))
        })
    }

    /// Raw key/value pairs at or below `prefix`, in key order.
    fn raw_under(&self, prefix: &StoragePath) -> Result<Vec<(String, Box<[u8]>)>> {
        let cf = self.family(prefix)?;
        let start = prefix.as_str().as_bytes();
        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(start, Direction::Forward));

        let mut entries = Vec::new();
        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(start) {
                break;
            }
            let key = String::from_utf8_lossy(&key).into_owned();
            if prefix.contains(&key) {
                entries.push((key, value));
            }
        }
        Ok(entries)
    }
}

#[async_trait]
impl Storage for RocksDBStore {
    async fn write(&self, path: &StoragePath, value: Value) -> Result<()> {
        let cf = self.family(path)?;
        let bytes = serde_json::to_vec(&value)?;
        self.db.put_cf(cf, path.as_str(), bytes)?;
        Ok(())
    }

    async fn clear(&self, path: &StoragePath) -> Result<()> {
        let cf = self.family(path)?;
        let mut batch = WriteBatch::default();
        for (key, _) in self.raw_under(path)? {
            batch.delete_cf(cf, key);
        }
        self.db.write(batch)?;
        Ok(())
    }

    async fn read(&self, path: &StoragePath) -> Result<Option<Value>> {
        let cf = self.family(path)?;
        match self.db.get_cf(cf, path.as_str())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn scan(&self, prefix: &StoragePath) -> Result<Vec<(String, Value)>> {
        self.raw_under(prefix)?
            .into_iter()
            .map(|(key, bytes)| -> Result<(String, Value)> {
                Ok((key, serde_json::from_slice(&bytes)?))
            })
            .collect()
    }
}
