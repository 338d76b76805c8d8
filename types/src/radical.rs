use serde::{Deserialize, Serialize};

/// A radical entry, either a base radical (id `"130"`) or a positional/
/// typographical variant (id `"130-2"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadicalRecord {
    /// Stable id; string-keyed rather than pointer-linked (spec.md §9 "Cyclic references").
    pub id: String,
    /// Classical radical number, shared by a base radical and all its variants.
    pub rad: u32,
    /// Base glyph.
    pub b: String,
    /// Kanji-form glyph, when the radical is also usable as a standalone kanji.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub r: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub m: Vec<String>,
    /// Stroke-count position tag (e.g. "hen", "tsukuri").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
}

impl RadicalRecord {
    pub fn is_base(&self) -> bool {
        !self.id.contains('-')
    }

    /// The id of the base radical that owns this variant (itself, if already base).
    pub fn base_id(&self) -> &str {
        self.id.split('-').next().unwrap_or(&self.id)
    }

    /// `rad` zero-padded to three digits, the canonical base id for a radical number.
    pub fn pad3(rad: u32) -> String {
        format!("{rad:03}")
    }
}
