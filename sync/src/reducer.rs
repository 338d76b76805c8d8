use jpdict_types::Version;

/// Milliseconds since the Unix epoch, supplied by the caller — the reducer
/// itself never reads the clock (spec.md §4.4 "pure mapping").
pub type Timestamp = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    pub loaded: u64,
    pub total: Option<u64>,
}

/// Per-series update state (spec.md §4.4).
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateState {
    Idle { last_check: Option<Timestamp> },
    Checking { last_check: Option<Timestamp> },
    Downloading {
        download_version: Version,
        progress: DownloadProgress,
        last_check: Option<Timestamp>,
    },
    UpdatingDb {
        download_version: Version,
        last_check: Option<Timestamp>,
    },
}

impl UpdateState {
    pub fn initial() -> Self {
        UpdateState::Idle { last_check: None }
    }

    fn last_check(&self) -> Option<Timestamp> {
        match self {
            UpdateState::Idle { last_check }
            | UpdateState::Checking { last_check }
            | UpdateState::Downloading { last_check, .. }
            | UpdateState::UpdatingDb { last_check, .. } => *last_check,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Start,
    StartDownload { version: Version },
    Progress { loaded: u64, total: Option<u64> },
    FinishDownload { version: Version },
    FinishPatch { version: Version },
    Finish { check_date: Timestamp },
    Error { check_date: Option<Timestamp> },
}

pub fn reduce(state: UpdateState, action: Action) -> UpdateState {
    match action {
        Action::Start => UpdateState::Checking {
            last_check: state.last_check(),
        },
        Action::StartDownload { version } => UpdateState::Downloading {
            download_version: version,
            progress: DownloadProgress { loaded: 0, total: None },
            last_check: state.last_check(),
        },
        Action::Progress { loaded, total } => match state {
            UpdateState::Downloading {
                download_version,
                last_check,
                ..
            } => UpdateState::Downloading {
                download_version,
                progress: DownloadProgress { loaded, total },
                last_check,
            },
            other => other,
        },
        Action::FinishDownload { version } => UpdateState::UpdatingDb {
            download_version: version,
            last_check: state.last_check(),
        },
        Action::FinishPatch { version: _ } => UpdateState::Idle {
            last_check: state.last_check(),
        },
        Action::Finish { check_date } => UpdateState::Idle {
            last_check: Some(check_date),
        },
        Action::Error { check_date } => UpdateState::Idle {
            last_check: check_date,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(patch: u32) -> Version {
        Version {
            major: 1,
            minor: 0,
            patch,
            snapshot: None,
            database_version: None,
            date_of_creation: "2024-01-01".into(),
            lang: "en".into(),
        }
    }

    #[test]
    fn start_moves_idle_to_checking() {
        let s = reduce(UpdateState::initial(), Action::Start);
        assert!(matches!(s, UpdateState::Checking { last_check: None }));
    }

    #[test]
    fn start_download_opens_a_version_slot() {
        let s = reduce(
            UpdateState::Checking { last_check: None },
            Action::StartDownload { version: version(0) },
        );
        match s {
            UpdateState::Downloading { download_version, .. } => {
                assert_eq!(download_version.patch, 0)
            }
            _ => panic!("expected Downloading"),
        }
    }

    #[test]
    fn progress_updates_in_place_without_losing_the_version() {
        let s = reduce(
            UpdateState::Downloading {
                download_version: version(0),
                progress: DownloadProgress { loaded: 0, total: Some(100) },
                last_check: None,
            },
            Action::Progress { loaded: 50, total: Some(100) },
        );
        match s {
            UpdateState::Downloading { progress, download_version, .. } => {
                assert_eq!(progress.loaded, 50);
                assert_eq!(download_version.patch, 0);
            }
            _ => panic!("expected Downloading"),
        }
    }

    #[test]
    fn finish_sets_last_check_and_returns_to_idle() {
        let s = reduce(
            UpdateState::UpdatingDb { download_version: version(1), last_check: None },
            Action::Finish { check_date: 1000 },
        );
        assert_eq!(s, UpdateState::Idle { last_check: Some(1000) });
    }

    #[test]
    fn error_with_no_check_date_nulls_last_check() {
        let s = reduce(
            UpdateState::Downloading {
                download_version: version(0),
                progress: DownloadProgress { loaded: 0, total: None },
                last_check: Some(42),
            },
            Action::Error { check_date: None },
        );
        assert_eq!(s, UpdateState::Idle { last_check: None });
    }

    #[test]
    fn error_with_a_check_date_uses_it() {
        let s = reduce(
            UpdateState::Downloading {
                download_version: version(0),
                progress: DownloadProgress { loaded: 0, total: None },
                last_check: Some(42),
            },
            Action::Error { check_date: Some(99) },
        );
        assert_eq!(s, UpdateState::Idle { last_check: Some(99) });
    }
}
