use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecorderError {
    /// Provider or identity data could not be turned into an outcome.
    #[error("Normalization error: {0}")]
    Normalization(String),
    #[error("Storage write error: {0}")]
    StorageWrite(String),
    #[error("Notification error: {0}")]
    Notification(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for RecorderError {
    fn from(err: rocksdb::Error) -> Self {
        RecorderError::StorageWrite(err.to_string())
    }
}

impl RecorderError {
    /// Folds any collaborator error into a storage write failure.
    pub(crate) fn into_storage_write(self) -> Self {
        match self {
            RecorderError::StorageWrite(_) => self,
            other => RecorderError::StorageWrite(other.to_string()),
        }
    }

    pub(crate) fn into_notification(self) -> Self {
        match self {
            RecorderError::Notification(_) => self,
            other => RecorderError::Notification(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecorderError>;
