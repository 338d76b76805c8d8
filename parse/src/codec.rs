//! Per-series parsing capability.
//!
//! spec.md §9 describes the Applier as "generic over (EntryLine, DeletionLine,
//! Record, IdType)", suggesting either a small interface capability per
//! series or tagged variants dispatched inside the applier. We take the
//! former: one zero-sized type per series implementing [`SeriesCodec`].

use crate::error::ParseError;
use crate::header::is_deletion_shaped;
use jpdict_types::{KanjiRecord, NameRecord, RadicalRecord, Series, WordRecord};
use serde_json::Value;

/// A classified, decoded LJSON data line (spec.md §6.2: entry or deletion).
#[derive(Debug, Clone)]
pub enum RawLine<Record, Key> {
    Entry(Record),
    Deletion(Key),
}

pub trait SeriesCodec {
    type Record: serde::de::DeserializeOwned + Clone + Send + Sync + 'static;
    type Key: Clone + Eq + std::hash::Hash + Send + Sync + 'static;

    const SERIES: Series;

    /// Required-key shape check for an entry line. An unrecognized shape
    /// must never be silently skipped (spec.md §4.2 bullet 7).
    fn has_required_keys(value: &Value) -> bool;

    fn to_record(value: Value) -> Result<Self::Record, serde_json::Error>;

    fn record_key(record: &Self::Record) -> Self::Key;

    /// Extract the key from a deletion line's key-fields, or `None` if the
    /// shape doesn't match this series' key type.
    fn deletion_key(value: &Value) -> Option<Self::Key>;
}

/// Classify and decode one already-parsed JSON line (the header line must be
/// handled separately by the caller before reaching this point).
pub fn classify_record<C: SeriesCodec>(
    value: Value,
    line_no: u64,
) -> Result<RawLine<C::Record, C::Key>, ParseError> {
    if is_deletion_shaped(&value) {
        return C::deletion_key(&value)
            .map(RawLine::Deletion)
            .ok_or(ParseError::InvalidRecord {
                line: line_no,
                series: C::SERIES.name(),
            });
    }

    if !C::has_required_keys(&value) {
        return Err(ParseError::InvalidRecord {
            line: line_no,
            series: C::SERIES.name(),
        });
    }

    C::to_record(value)
        .map(RawLine::Entry)
        .map_err(|source| ParseError::InvalidJson {
            line: line_no,
            source,
        })
}

fn obj_has_number(value: &Value, key: &str) -> bool {
    value
        .as_object()
        .and_then(|o| o.get(key))
        .map(|v| v.is_number())
        .unwrap_or(false)
}

fn obj_has_string(value: &Value, key: &str) -> bool {
    value
        .as_object()
        .and_then(|o| o.get(key))
        .map(|v| v.is_string())
        .unwrap_or(false)
}

fn deletion_u32(value: &Value, key: &str) -> Option<u32> {
    value
        .as_object()?
        .get(key)?
        .as_u64()
        .map(|n| n as u32)
}

fn deletion_string(value: &Value, key: &str) -> Option<String> {
    value.as_object()?.get(key)?.as_str().map(str::to_owned)
}

pub struct KanjiCodec;

impl SeriesCodec for KanjiCodec {
    type Record = KanjiRecord;
    type Key = u32;

    const SERIES: Series = Series::Kanji;

    fn has_required_keys(value: &Value) -> bool {
        obj_has_number(value, "c")
            && value
                .as_object()
                .and_then(|o| o.get("rad"))
                .map(|r| r.is_object())
                .unwrap_or(false)
    }

    fn to_record(value: Value) -> Result<Self::Record, serde_json::Error> {
        serde_json::from_value(value)
    }

    fn record_key(record: &Self::Record) -> Self::Key {
        record.c
    }

    fn deletion_key(value: &Value) -> Option<Self::Key> {
        deletion_u32(value, "c")
    }
}

pub struct RadicalCodec;

impl SeriesCodec for RadicalCodec {
    type Record = RadicalRecord;
    type Key = String;

    const SERIES: Series = Series::Radicals;

    fn has_required_keys(value: &Value) -> bool {
        obj_has_string(value, "id") && obj_has_number(value, "rad") && obj_has_string(value, "b")
    }

    fn to_record(value: Value) -> Result<Self::Record, serde_json::Error> {
        serde_json::from_value(value)
    }

    fn record_key(record: &Self::Record) -> Self::Key {
        record.id.clone()
    }

    fn deletion_key(value: &Value) -> Option<Self::Key> {
        deletion_string(value, "id")
    }
}

pub struct NameCodec;

impl SeriesCodec for NameCodec {
    type Record = NameRecord;
    type Key = u32;

    const SERIES: Series = Series::Names;

    fn has_required_keys(value: &Value) -> bool {
        obj_has_number(value, "id")
    }

    fn to_record(value: Value) -> Result<Self::Record, serde_json::Error> {
        serde_json::from_value(value)
    }

    fn record_key(record: &Self::Record) -> Self::Key {
        record.id
    }

    fn deletion_key(value: &Value) -> Option<Self::Key> {
        deletion_u32(value, "id")
    }
}

pub struct WordCodec;

impl SeriesCodec for WordCodec {
    type Record = WordRecord;
    type Key = u32;

    const SERIES: Series = Series::Words;

    fn has_required_keys(value: &Value) -> bool {
        obj_has_number(value, "id")
    }

    fn to_record(value: Value) -> Result<Self::Record, serde_json::Error> {
        serde_json::from_value(value)
    }

    fn record_key(record: &Self::Record) -> Self::Key {
        record.id
    }

    fn deletion_key(value: &Value) -> Option<Self::Key> {
        deletion_u32(value, "id")
    }
}
