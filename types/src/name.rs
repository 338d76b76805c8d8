use serde::{Deserialize, Serialize};

/// A single translation/gloss group on a name entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    /// Name-type tags (surname, given name, place, ...).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ty: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub det: Vec<String>,
}

/// A proper-name entry, keyed by an integer id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub k: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub r: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tr: Vec<Translation>,
}
