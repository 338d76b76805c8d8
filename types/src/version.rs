use serde::{Deserialize, Serialize};

/// A data-version record, one per series, stored in the dedicated Version
/// table (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_version: Option<String>,
    pub date_of_creation: String,
    pub lang: String,
}

impl Version {
    pub const fn triple(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch)
    }

    /// True when `self` is strictly ahead of `other` by the (major, minor,
    /// patch) ordering used throughout the sync pipeline.
    pub fn is_newer_than(&self, other: &Version) -> bool {
        self.triple() > other.triple()
    }
}

/// The `version` field embedded in a manifest entry or a data file header,
/// before it has been paired with a language (spec.md §6.1, §6.2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionHeader {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_version: Option<String>,
    pub date_of_creation: String,
}

impl VersionHeader {
    pub const fn triple(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch)
    }

    pub fn with_lang(self, lang: String) -> Version {
        Version {
            major: self.major,
            minor: self.minor,
            patch: self.patch,
            snapshot: None,
            database_version: self.database_version,
            date_of_creation: self.date_of_creation,
            lang,
        }
    }
}

/// One entry of the remote manifest: `manifest[series][majorVersion]` (spec.md §6.1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub snapshot: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_version: Option<String>,
    pub date_of_creation: String,
}
