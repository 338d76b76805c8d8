use jpdict_types::Series;
use serde::{de::DeserializeOwned, Serialize};

/// Glues a [`jpdict_types`] record type to its primary-key encoding and
/// secondary-index registration, so [`crate::store::Store`] can be generic
/// over "which series" rather than repeating the bulk-update machinery four
/// times.
pub trait StoreSeries {
    type Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;
    type Key: Clone + Send + Sync + 'static;

    const SERIES: Series;

    fn primary_key(record: &Self::Record) -> Vec<u8>;
    fn key_bytes(key: &Self::Key) -> Vec<u8>;
    fn index_entries(record: &Self::Record) -> Vec<(u8, String)>;
}

pub struct KanjiSeries;
pub struct RadicalSeries;
pub struct NameSeries;
pub struct WordSeries;

impl StoreSeries for KanjiSeries {
    type Record = jpdict_types::KanjiRecord;
    type Key = u32;
    const SERIES: Series = Series::Kanji;

    fn primary_key(record: &Self::Record) -> Vec<u8> {
        crate::series::kanji::primary_key(record)
    }
    fn key_bytes(key: &Self::Key) -> Vec<u8> {
        crate::key::u32_key(*key)
    }
    fn index_entries(record: &Self::Record) -> Vec<(u8, String)> {
        crate::series::kanji::index_entries(record)
    }
}

impl StoreSeries for RadicalSeries {
    type Record = jpdict_types::RadicalRecord;
    type Key = String;
    const SERIES: Series = Series::Radicals;

    fn primary_key(record: &Self::Record) -> Vec<u8> {
        crate::series::radical::primary_key(record)
    }
    fn key_bytes(key: &Self::Key) -> Vec<u8> {
        crate::key::str_key(key)
    }
    fn index_entries(record: &Self::Record) -> Vec<(u8, String)> {
        crate::series::radical::index_entries(record)
    }
}

impl StoreSeries for NameSeries {
    type Record = jpdict_types::NameRecord;
    type Key = u32;
    const SERIES: Series = Series::Names;

    fn primary_key(record: &Self::Record) -> Vec<u8> {
        crate::series::name::primary_key(record)
    }
    fn key_bytes(key: &Self::Key) -> Vec<u8> {
        crate::key::u32_key(*key)
    }
    fn index_entries(record: &Self::Record) -> Vec<(u8, String)> {
        crate::series::name::index_entries(record)
    }
}

impl StoreSeries for WordSeries {
    type Record = jpdict_types::WordRecord;
    type Key = u32;
    const SERIES: Series = Series::Words;

    fn primary_key(record: &Self::Record) -> Vec<u8> {
        crate::series::word::primary_key(record)
    }
    fn key_bytes(key: &Self::Key) -> Vec<u8> {
        crate::key::u32_key(*key)
    }
    fn index_entries(record: &Self::Record) -> Vec<(u8, String)> {
        crate::series::word::index_entries(record)
    }
}
