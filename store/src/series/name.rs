use std::collections::HashSet;

use crate::key;
use jpdict_types::NameRecord;

/// Required secondary indexes on the names series (spec.md §3 data model
/// table): kanji spellings, kana readings (verbatim), and the derived
/// hiragana-normalized reading index consumed by `Store::get_names`'
/// kana-equivalence pass.
pub const TAG_KANJI: u8 = 0;
pub const TAG_READING: u8 = 1;
pub const TAG_HIRAGANA: u8 = 2;

pub fn primary_key(record: &NameRecord) -> Vec<u8> {
    key::u32_key(record.id)
}

/// spec.md §3 key invariant: the derived hiragana index only gets an entry
/// for readings that contain at least one hiragana character after
/// normalization, and duplicate normalized values on one record collapse to
/// a single entry.
pub fn index_entries(record: &NameRecord) -> Vec<(u8, String)> {
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
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_is_indexed_verbatim_and_normalized() {
        let n = NameRecord {
            id: 1,
            k: vec!["中野".into()],
            r: vec!["ナカノ".into()],
            tr: vec![],
        };
        let entries = index_entries(&n);
        assert!(entries.contains(&(TAG_READING, "ナカノ".to_string())));
        assert!(entries.contains(&(TAG_HIRAGANA, "なかの".to_string())));
        assert!(entries.contains(&(TAG_KANJI, "中野".to_string())));
    }

    #[test]
    fn reading_with_no_hiragana_after_normalization_skips_the_derived_index() {
        let n = NameRecord {
            id: 2,
            k: vec![],
            r: vec!["ー".into()],
            tr: vec![],
        };
        let entries = index_entries(&n);
        assert!(!entries.iter().any(|(tag, _)| *tag == TAG_HIRAGANA));
    }

    #[test]
    fn duplicate_normalized_values_collapse_to_one_entry() {
        let n = NameRecord {
            id: 3,
            k: vec![],
            r: vec!["かな".into(), "カナ".into()],
            tr: vec![],
        };
        let entries = index_entries(&n);
        let hiragana_count = entries
            .iter()
            .filter(|(tag, _)| *tag == TAG_HIRAGANA)
            .count();
        assert_eq!(hiragana_count, 1);
    }
}
