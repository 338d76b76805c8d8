//! Shared record and query-result shapes for the jpdict sync/query engine.
//!
//! This crate carries no I/O and no storage-engine dependency; it is the
//! vocabulary every other `jpdict-*` crate speaks.

pub mod kanji;
pub mod name;
pub mod query;
pub mod radical;
pub mod series;
pub mod version;
pub mod word;

pub use kanji::{KanjiMisc, KanjiRecord, RadicalRef, Readings};
pub use name::{NameRecord, Translation};
pub use query::{
    ComponentResult, KanjiResult, MatchRank, NameQueryResult, RadicalBase, RadicalResult,
    RankedName, RelatedKanji,
};
pub use radical::RadicalRecord;
pub use series::{Series, SeriesSet};
pub use version::{ManifestEntry, Version, VersionHeader};
pub use word::{Sense, WordRecord};
