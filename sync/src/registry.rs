use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use jpdict_types::Series;

use crate::error::SyncError;

/// Enforces "at most one Applier per (store, series)" (spec.md §4.3). One
/// registry is held per `Store`; [`InFlightGuard`] releases its slot on drop
/// so a panicking or cancelled Applier can't wedge the series forever.
#[derive(Default, Clone)]
pub struct InFlightRegistry {
    active: Arc<Mutex<HashSet<Series>>>,
}

pub struct InFlightGuard {
    active: Arc<Mutex<HashSet<Series>>>,
    series: Series,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self, series: Series) -> Result<InFlightGuard, SyncError> {
        let mut active = self.active.lock().expect("registry mutex poisoned");
        if !active.insert(series) {
            return Err(SyncError::OverlappingUpdate);
        }
        Ok(InFlightGuard {
            active: self.active.clone(),
            series,
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active
            .lock()
            .expect("registry mutex poisoned")
            .remove(&self.series);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_second_acquire_for_the_same_series_fails() {
        let registry = InFlightRegistry::new();
        let _guard = registry.try_acquire(Series::Kanji).unwrap();
        assert!(matches!(
            registry.try_acquire(Series::Kanji),
            Err(SyncError::OverlappingUpdate)
        ));
    }

    #[test]
    fn releasing_the_guard_frees_the_slot() {
        let registry = InFlightRegistry::new();
        {
            let _guard = registry.try_acquire(Series::Kanji).unwrap();
        }
        assert!(registry.try_acquire(Series::Kanji).is_ok());
    }

    #[test]
    fn different_series_do_not_contend() {
        let registry = InFlightRegistry::new();
        let _a = registry.try_acquire(Series::Kanji).unwrap();
        assert!(registry.try_acquire(Series::Radicals).is_ok());
    }
}
