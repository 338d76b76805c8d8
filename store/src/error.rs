use thiserror::Error;

/// Storage-layer failures (spec.md §7 "Storage" taxonomy).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage engine is unavailable: {0}")]
    Unavailable(String),

    #[error("storage quota exceeded")]
    QuotaExceeded,

    #[error("constraint violation during write: {0}")]
    ConstraintViolation(String),

    #[error(
        "store has schema version {stored}, which is newer than the requested {requested}"
    )]
    SchemaTooNew { stored: u32, requested: u32 },

    #[error("another handle is already holding this store open")]
    Blocking,

    #[error("series {0} has not been migrated into this store's schema")]
    SeriesNotAvailable(&'static str),

    #[error(transparent)]
    Sled(#[from] sled::Error),

    #[error(transparent)]
    Encode(#[from] bincode::Error),
}

impl StoreError {
    pub fn retriable(&self) -> bool {
        matches!(self, StoreError::Blocking)
    }
}

impl From<sled::transaction::TransactionError<StoreError>> for StoreError {
    fn from(e: sled::transaction::TransactionError<StoreError>) -> Self {
        match e {
            sled::transaction::TransactionError::Abort(inner) => inner,
            sled::transaction::TransactionError::Storage(s) => StoreError::Sled(s),
        }
    }
}
