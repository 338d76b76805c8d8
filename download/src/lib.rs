//! Version discovery and streaming LJSON ingestion (spec.md §4.2).
//!
//! This crate owns HTTP and protocol framing only; it knows nothing about
//! the per-series record shapes (that's `jpdict-parse`'s `SeriesCodec`) or
//! how events get applied to storage (that's `jpdict-sync`).

pub mod error;
pub mod event;
pub mod manifest;
pub mod plan;
pub mod stream;

pub use error::DownloadError;
pub use event::DownloadEvent;
pub use manifest::Manifest;
pub use plan::{FileRequest, FileType};
