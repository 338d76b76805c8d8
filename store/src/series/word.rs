use std::collections::HashSet;

use crate::key;
use jpdict_types::WordRecord;

/// Words carry the same kanji/kana shape as names plus a gloss-token index
/// for the pluggable ranker (spec.md §3 "fourth optional series"; SPEC_FULL.md §7).
pub const TAG_KANJI: u8 = 0;
pub const TAG_READING: u8 = 1;
pub const TAG_HIRAGANA: u8 = 2;
pub const TAG_GLOSS: u8 = 3;

pub fn primary_key(record: &WordRecord) -> Vec<u8> {
    key::u32_key(record.id)
}

pub fn index_entries(record: &WordRecord) -> Vec<(u8, String)> {
    let mut entries: Vec<(u8, String)> = record.k.iter().map(|k| (TAG_KANJI, k.clone())).collect();
    entries.extend(record.r.iter().map(|r| (TAG_READING, r.clone())));

    let mut seen_hiragana = HashSet::new();
    for r in &record.r {
        let normalized = jpdict_parse::katakana_to_hiragana(r);
        if jpdict_parse::contains_hiragana(&normalized) && seen_hiragana.insert(normalized.clone())
        {
            entries.push((TAG_HIRAGANA, normalized));
        }
    }

    entries.extend(record.gloss_tokens().into_iter().map(|t| (TAG_GLOSS, t)));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpdict_types::Sense;

    #[test]
    fn gloss_tokens_are_lowercased_and_indexed() {
        let w = WordRecord {
            id: 1,
            k: vec![],
            r: vec![],
            sense: vec![Sense {
                gloss: vec!["To Pull".into()],
                pos: vec![],
            }],
        };
        let entries = index_entries(&w);
        assert!(entries.contains(&(TAG_GLOSS, "to".to_string())));
        assert!(entries.contains(&(TAG_GLOSS, "pull".to_string())));
    }

    #[test]
    fn kanji_and_hiragana_indexes_mirror_the_names_series() {
        let w = WordRecord {
            id: 2,
            k: vec!["引く".into()],
            r: vec!["ひく".into()],
            sense: vec![],
        };
        let entries = index_entries(&w);
        assert!(entries.contains(&(TAG_KANJI, "引く".to_string())));
        assert!(entries.contains(&(TAG_HIRAGANA, "ひく".to_string())));
    }
}
