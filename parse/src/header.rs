use jpdict_types::VersionHeader;
use serde::Deserialize;

/// The first line of every data file (spec.md §6.2).
#[derive(Debug, Clone, Deserialize)]
pub struct HeaderLine {
    #[serde(rename = "type")]
    pub ty: String,
    pub version: VersionHeader,
    pub records: u64,
}

impl HeaderLine {
    pub fn is_header_shaped(value: &serde_json::Value) -> bool {
        value
            .as_object()
            .and_then(|o| o.get("type"))
            .and_then(|t| t.as_str())
            == Some("header")
    }
}

/// Whether a decoded JSON object line represents a deletion record: the
/// series-agnostic part of spec.md §6.2 ("Deletion shape: `{ ...key-fields...,
/// "deleted": true }`"). Per-series predicates layer further key-shape
/// validation on top of this.
pub fn is_deletion_shaped(value: &serde_json::Value) -> bool {
    value
        .as_object()
        .and_then(|o| o.get("deleted"))
        .and_then(|d| d.as_bool())
        == Some(true)
}
