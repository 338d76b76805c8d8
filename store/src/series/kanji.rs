use crate::key;
use jpdict_types::KanjiRecord;

/// Required secondary indexes on the kanji series (spec.md §3 data model
/// table): reading-on, reading-kun, reading-name, each multi-valued over the
/// record's reading arrays. No operation in §4.5 queries these directly
/// today — `getKanji` resolves readings off the record it already fetched by
/// primary key — but they are kept populated for data-model parity with the
/// table in §3; a future reading-search lookup is then a pure query
/// addition, not a migration.
pub const TAG_READING_ON: u8 = 0;
pub const TAG_READING_KUN: u8 = 1;
pub const TAG_READING_NAME: u8 = 2;

pub fn primary_key(record: &KanjiRecord) -> Vec<u8> {
    key::u32_key(record.c)
}

pub fn index_entries(record: &KanjiRecord) -> Vec<(u8, String)> {
    let mut entries =
        Vec::with_capacity(record.r.on.len() + record.r.kun.len() + record.r.na.len());
    entries.extend(record.r.on.iter().map(|r| (TAG_READING_ON, r.clone())));
    entries.extend(record.r.kun.iter().map(|r| (TAG_READING_KUN, r.clone())));
    entries.extend(record.r.na.iter().map(|r| (TAG_READING_NAME, r.clone())));
    entries
}
