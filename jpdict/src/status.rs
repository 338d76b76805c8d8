use jpdict_sync::UpdateState;
use jpdict_types::Version;

/// Per-series state visible to clients (spec.md §4.5, §6.4 "Read-only
/// accessors for per-series `{state, version, updateState}`").
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseState {
    Initializing,
    Empty,
    Ok,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStatus {
    pub state: DatabaseState,
    pub version: Option<Version>,
    pub update_state: UpdateState,
}

impl SeriesStatus {
    pub fn initial() -> Self {
        Self {
            state: DatabaseState::Initializing,
            version: None,
            update_state: UpdateState::initial(),
        }
    }

    pub fn from_version(version: Option<Version>, update_state: UpdateState) -> Self {
        Self {
            state: match &version {
                Some(_) => DatabaseState::Ok,
                None => DatabaseState::Empty,
            },
            version,
            update_state,
        }
    }
}
