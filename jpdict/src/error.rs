use jpdict_download::DownloadError;
use jpdict_store::StoreError;
use jpdict_sync::SyncError;
use thiserror::Error;

/// Top-level facade error (spec.md §7): every component-level error taxonomy
/// folds into this one, since `Database` is the single public entry point.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error(transparent)]
    Download(#[from] DownloadError),
    #[error("no radicals have been synced yet; call update() first")]
    RadicalsNotSynced,
    /// Surfaced to a caller that joined an in-flight update for the same
    /// series/lang, carrying the leader's error rendered to a string (the
    /// original isn't `Clone`, see `database.rs`).
    #[error("{0}")]
    Shared(String),
}

impl Error {
    pub fn retriable(&self) -> bool {
        match self {
            Error::Store(e) => e.retriable(),
            Error::Sync(e) => e.retriable(),
            Error::Download(e) => e.retriable(),
            Error::RadicalsNotSynced => false,
            Error::Shared(_) => false,
        }
    }
}
