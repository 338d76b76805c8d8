use serde::{Deserialize, Serialize};

/// One sense (gloss group) of a word entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sense {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gloss: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pos: Vec<String>,
}

/// A word entry. Schema-gated: present only once a store has migrated to the
/// schema version that introduces the `words` series (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub k: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub r: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sense: Vec<Sense>,
}

impl WordRecord {
    /// Gloss tokens across all senses, lowercased, for the gloss-token index.
    pub fn gloss_tokens(&self) -> Vec<String> {
        self.sense
            .iter()
            .flat_map(|s| s.gloss.iter())
            .flat_map(|g| g.split_whitespace())
            .map(|t| t.to_lowercase())
            .collect()
    }
}
