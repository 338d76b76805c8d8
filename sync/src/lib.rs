//! Update Applier, state reducer, and update-with-retry wrapper (spec.md
//! §4.3, §4.4, §4.6).
//!
//! This crate is where `jpdict-download`'s series-agnostic events meet
//! `jpdict-store`'s series-typed writes: [`applier::apply_update`] drives
//! one series' plan of full-snapshot/patch files end to end, [`reducer`]
//! tracks the resulting per-series state as a pure function, and
//! [`retry::with_retry`] wraps the whole thing with backoff, constraint
//! retries, and offline handling for the Facade.

pub mod applier;
pub mod backoff;
pub mod error;
pub mod reducer;
pub mod registry;
pub mod retry;

pub use applier::apply_update;
pub use backoff::Backoff;
pub use error::SyncError;
pub use reducer::{reduce, Action, UpdateState};
pub use registry::{InFlightGuard, InFlightRegistry};
pub use retry::{with_retry, AlwaysOnline, Reachability};
