//! Line-delimited JSON protocol parsing for jpdict data files (spec.md §4.2, §6.2).
//!
//! This crate is pure: no network I/O lives here. `jpdict-download` drives
//! [`line::LineSplitter`] with bytes off the wire and classifies header vs.
//! deletion lines on its own (it knows nothing about a given series' record
//! shape); `jpdict-sync`'s Applier is what calls [`codec::classify_record`]
//! (or the [`SeriesCodec`] methods directly) to validate and decode each
//! entry/deletion payload against the series it's updating.

pub mod codec;
pub mod error;
pub mod header;
pub mod kana;
pub mod line;

pub use codec::{KanjiCodec, NameCodec, RadicalCodec, RawLine, SeriesCodec, WordCodec};
pub use error::ParseError;
pub use header::HeaderLine;
pub use line::LineSplitter;
