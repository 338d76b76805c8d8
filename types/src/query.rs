use crate::kanji::{KanjiMisc, Readings};
use crate::name::NameRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The radical info attached to a resolved kanji lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadicalResult {
    pub x: u32,
    pub b: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,
    /// Present iff a variant (rather than the base) radical was selected for
    /// this kanji (spec.md §8 testable property).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<RadicalBase>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadicalBase {
    pub b: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,
}

/// One resolved component of a kanji's `comp` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentResult {
    pub c: char,
    pub na: Vec<String>,
    pub m: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m_lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,
}

/// A related kanji, expanded from a `cf` id (spec.md §4.5 bullet 5).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedKanji {
    pub c: u32,
    pub r: Readings,
    pub m: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m_lang: Option<String>,
    pub misc: KanjiMisc,
}

/// The fully resolved result of a `getKanji` lookup for one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanjiResult {
    pub c: u32,
    pub r: Readings,
    pub m: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m_lang: Option<String>,
    pub rad: RadicalResult,
    pub comp: Vec<ComponentResult>,
    #[serde(default)]
    pub refs: HashMap<String, serde_json::Value>,
    pub misc: KanjiMisc,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cf: Vec<RelatedKanji>,
}

/// Result rank for a name/word lookup (spec.md §4.5, GLOSSARY "Kana-equivalent match").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchRank {
    /// Matched the kanji-spelling or reading index on the literal query.
    Exact,
    /// Matched only after hiragana-normalization of the query and/or index.
    KanaEquivalent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedName {
    pub rank: MatchRank,
    pub record: NameRecord,
}

/// The result of a `getNames` query: exact matches first, then kana-equivalent
/// matches, insertion order preserved within each rank (spec.md §4.5, §8).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameQueryResult {
    pub matches: Vec<RankedName>,
}

impl NameQueryResult {
    pub fn records(&self) -> impl Iterator<Item = &NameRecord> {
        self.matches.iter().map(|m| &m.record)
    }
}
