use jpdict_parse::ParseError;
use thiserror::Error;

/// Downloader failures (spec.md §7). The network group is retriable by the
/// caller (jpdict-sync applies the backoff policy); the protocol group means
/// upstream sent something malformed and retrying verbatim won't help.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("version manifest not found")]
    ManifestNotFound,
    #[error("version manifest not accessible: {0}")]
    ManifestNotAccessible(String),
    #[error("version manifest is malformed: {0}")]
    ManifestInvalid(String),
    #[error("data file not found: {url}")]
    DataFileNotFound { url: String },
    #[error("data file not accessible: {url} (status {status:?})")]
    DataFileNotAccessible { url: String, status: Option<u16> },

    #[error("manifest has no entry for {series} major version {major}")]
    MajorVersionNotFound { series: &'static str, major: u32 },
    #[error("local database version is newer than upstream")]
    DatabaseTooOld,
    #[error(transparent)]
    Protocol(#[from] ParseError),

    #[error("update cancelled")]
    Cancelled,
}

impl DownloadError {
    pub fn retriable(&self) -> bool {
        matches!(
            self,
            DownloadError::ManifestNotFound
                | DownloadError::ManifestNotAccessible(_)
                | DownloadError::ManifestInvalid(_)
                | DownloadError::DataFileNotFound { .. }
                | DownloadError::DataFileNotAccessible { .. }
        )
    }
}
