//! Database Facade and query layer (spec.md §4.5): the single public entry
//! point for consumers. Owns the embedded [`jpdict_store::Store`],
//! serializes/coalesces per-series updates through `jpdict-sync`, and adds
//! radical-variant resolution, component expansion, and related-kanji
//! expansion on top of the raw records `jpdict-store` hands back.

mod database;
mod error;
mod events;
mod kanji;
mod katakana;
mod names;
mod status;

pub use database::{Database, DatabaseOptions};
pub use error::Error;
pub use events::ChangeEvent;
pub use kanji::RadicalCache;
pub use names::{InsertionOrderRanker, RankedWord, WordRanker};
pub use status::{DatabaseState, SeriesStatus};

pub use jpdict_types::{
    ComponentResult, KanjiResult, MatchRank, NameQueryResult, RadicalBase, RadicalResult,
    RankedName, RelatedKanji, Series, SeriesSet, Version,
};
