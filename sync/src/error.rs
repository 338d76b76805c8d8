use jpdict_download::DownloadError;
use jpdict_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Download(#[from] DownloadError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("update cancelled")]
    Abort,
    #[error("an update is already in flight for this (store, series)")]
    OverlappingUpdate,
    #[error("no network reachable")]
    Offline,
}

impl SyncError {
    /// Network-class errors are retriable with backoff (spec.md §4.6); a
    /// constraint violation gets its own narrower idle-time retry; anything
    /// else (protocol, abort, overlap) is terminal.
    pub fn retriable(&self) -> bool {
        match self {
            SyncError::Download(e) => e.retriable(),
            SyncError::Offline => true,
            _ => false,
        }
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, SyncError::Store(StoreError::ConstraintViolation(_)))
    }
}
