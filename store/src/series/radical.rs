use crate::key;
use jpdict_types::RadicalRecord;

/// Required secondary indexes on the radicals series (spec.md §3 data model
/// table): radical number, base glyph, kanji glyph.
pub const TAG_NUMBER: u8 = 0;
pub const TAG_BASE: u8 = 1;
pub const TAG_KANJI: u8 = 2;

pub fn primary_key(record: &RadicalRecord) -> Vec<u8> {
    key::str_key(&record.id)
}

pub fn index_entries(record: &RadicalRecord) -> Vec<(u8, String)> {
    let mut entries = vec![
        (TAG_NUMBER, record.rad.to_string()),
        (TAG_BASE, record.b.clone()),
    ];
    if let Some(k) = &record.k {
        if k != &record.b {
            entries.push((TAG_KANJI, k.clone()));
        }
    }
    entries
}
