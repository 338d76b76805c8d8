use jpdict_types::VersionHeader;

/// Decoded download events, in the order they are produced per file
/// (spec.md §4.2 "Event variants"). Entry/deletion lines are handed through
/// as raw JSON; the caller (jpdict-sync) owns the per-series codec that
/// turns them into typed records.
#[derive(Debug, Clone)]
pub enum DownloadEvent {
    Version { header: VersionHeader, partial: bool },
    Entry(serde_json::Value),
    Deletion(serde_json::Value),
    Progress { loaded: u64, total: Option<u64> },
    VersionEnd,
}
