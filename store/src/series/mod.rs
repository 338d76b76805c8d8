//! Per-series storage mapping: which secondary indexes a record registers,
//! and the primary-key encoding for its id type.

pub mod kanji;
pub mod name;
pub mod radical;
pub mod word;
