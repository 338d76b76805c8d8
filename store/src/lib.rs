//! Embedded, transactional, multi-series keyed storage (spec.md §4.1).
//!
//! Backed by `sled`. Each series lives in its own (data, index) tree pair,
//! generation-suffixed so a full-table replace can be staged invisibly and
//! swapped in atomically; see [`store::Store::bulk_update`] and
//! DESIGN.md for why old generations are never garbage-collected.

mod envelope;
pub mod error;
mod generation;
mod index_key;
mod key;
mod lifecycle;
mod progress;
mod schema;
pub mod series;
mod series_trait;
mod store;

pub use envelope::Envelope;
pub use error::StoreError;
pub use lifecycle::State as LifecycleState;
pub use progress::{Progress, ProgressFn};
pub use schema::CURRENT_SCHEMA_VERSION;
pub use series_trait::{KanjiSeries, NameSeries, RadicalSeries, StoreSeries, WordSeries};
pub use store::{DropSpec, Store, DEFAULT_BATCH_SIZE};
