use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The radical cross-reference carried on a kanji record: a classical radical
/// number plus the ids of any typographical variants relevant to this
/// character (e.g. `["9-2"]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadicalRef {
    /// Classical radical number (KangXi), `rad.x` in spec.md.
    pub x: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub var: Vec<String>,
}

/// The three reading classes kept on a kanji record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readings {
    /// On-yomi, conventionally written in katakana.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on: Vec<String>,
    /// Kun-yomi; okurigana boundaries are marked with `.` (e.g. `"ひ.く"`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kun: Vec<String>,
    /// Nanori, readings used only in names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub na: Vec<String>,
}

impl Readings {
    /// Kun readings with the okurigana-boundary marker stripped, kun before
    /// on — used by component resolution (spec.md §4.5 bullet 4).
    pub fn component_readings(&self) -> Vec<String> {
        if !self.kun.is_empty() {
            self.kun.iter().map(|r| r.replace('.', "")).collect()
        } else {
            self.on.clone()
        }
    }
}

/// A kanji entry as it is stored, keyed by Unicode scalar value (`c`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KanjiRecord {
    /// Unicode scalar value; the primary key for this series.
    pub c: u32,
    #[serde(default)]
    pub r: Readings,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub m: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m_lang: Option<String>,
    pub rad: RadicalRef,
    /// Characters making up this kanji visually, in display order; resolved
    /// against radicals/kanji/katakana by `Database::get_kanji`.
    #[serde(default)]
    pub comp: String,
    /// Reference numbers keyed by dictionary/index name (Nelson, Heisig, ...).
    #[serde(default)]
    pub refs: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strokes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freq: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jlpt: Option<u32>,
    /// Ids of related kanji (`cf` in spec.md §4.5 bullet 5).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cf: Vec<u32>,
}

impl KanjiRecord {
    pub fn char(&self) -> Option<char> {
        char::from_u32(self.c)
    }

    pub fn misc(&self) -> KanjiMisc {
        KanjiMisc {
            strokes: self.strokes,
            grade: self.grade,
            freq: self.freq,
            jlpt: self.jlpt,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanjiMisc {
    pub strokes: Option<u32>,
    pub grade: Option<u32>,
    pub freq: Option<u32>,
    pub jlpt: Option<u32>,
}
