use crate::error::StoreError;
use jpdict_types::Series;

/// Schema version this crate understands out of the box, used as the
/// default `schema_version` a caller's `Config` requests when it doesn't
/// override it (SPEC_FULL.md §1 "Configuration"). Bump this and add a
/// migration step whenever a new series or tree layout is introduced.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

const SCHEMA_KEY: &[u8] = b"schema_version";

/// The schema version a series first became available in. A store opened
/// against an older on-disk schema simply has not migrated that series in
/// yet; callers see [`StoreError::SeriesNotAvailable`] until the next full
/// resync brings the schema forward.
fn min_schema_for(series: Series) -> u32 {
    match series {
        Series::Kanji | Series::Radicals | Series::Names => 1,
        Series::Words => 2,
    }
}

pub fn ensure_available(stored_schema: u32, series: Series) -> Result<(), StoreError> {
    if stored_schema < min_schema_for(series) {
        Err(StoreError::SeriesNotAvailable(series.name()))
    } else {
        Ok(())
    }
}

fn read_stored(meta: &sled::Tree) -> Result<Option<u32>, StoreError> {
    match meta.get(SCHEMA_KEY)? {
        Some(v) => {
            let mut buf = [0u8; 4];
            buf.copy_from_slice(&v);
            Ok(Some(u32::from_be_bytes(buf)))
        }
        None => Ok(None),
    }
}

/// Reads the schema version currently recorded in `meta`. Only meaningful
/// after [`open_or_init`] has run at least once (i.e. after `Store::open`);
/// falls back to [`CURRENT_SCHEMA_VERSION`] on an unopened tree rather than
/// panicking.
pub fn current(meta: &sled::Tree) -> Result<u32, StoreError> {
    Ok(read_stored(meta)?.unwrap_or(CURRENT_SCHEMA_VERSION))
}

/// Reads the schema version recorded in `meta`, initializing it to
/// `requested` on a fresh (empty) store (spec.md §4.1 "schema version is
/// embedded in the open call"). Returns [`StoreError::SchemaTooNew`] if the
/// on-disk store was written at a schema newer than `requested`.
pub fn open_or_init(meta: &sled::Tree, requested: u32) -> Result<u32, StoreError> {
    match read_stored(meta)? {
        Some(stored) => {
            if stored > requested {
                return Err(StoreError::SchemaTooNew { stored, requested });
            }
            Ok(stored)
        }
        None => {
            meta.insert(SCHEMA_KEY, &requested.to_be_bytes())?;
            Ok(requested)
        }
    }
}

/// Called after a series' first successful full resync under the current
/// binary, advancing the stored schema if this series required a newer one
/// than the store was opened at (spec.md §4.1 "only additive migrations...
/// scripted per step so that partial version jumps compose correctly").
pub fn record_migration(meta: &sled::Tree, series: Series) -> Result<(), StoreError> {
    let needed = min_schema_for(series);
    let stored = current(meta)?;
    if needed > stored {
        meta.insert(SCHEMA_KEY, &needed.to_be_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_store_initializes_to_the_requested_version() {
        let db = sled::Config::new().temporary(true).open().unwrap();
        let meta = db.open_tree("meta").unwrap();
        assert_eq!(open_or_init(&meta, CURRENT_SCHEMA_VERSION).unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn newer_on_disk_schema_is_rejected() {
        let db = sled::Config::new().temporary(true).open().unwrap();
        let meta = db.open_tree("meta").unwrap();
        meta.insert(SCHEMA_KEY, &(CURRENT_SCHEMA_VERSION + 1).to_be_bytes())
            .unwrap();
        assert!(matches!(
            open_or_init(&meta, CURRENT_SCHEMA_VERSION),
            Err(StoreError::SchemaTooNew { .. })
        ));
    }

    #[test]
    fn opening_at_a_lower_schema_than_stored_fails_cleanly() {
        let db = sled::Config::new().temporary(true).open().unwrap();
        let meta = db.open_tree("meta").unwrap();
        open_or_init(&meta, 2).unwrap();
        assert!(matches!(
            open_or_init(&meta, 1),
            Err(StoreError::SchemaTooNew { stored: 2, requested: 1 })
        ));
    }

    #[test]
    fn words_unavailable_until_schema_two() {
        assert!(ensure_available(1, Series::Words).is_err());
        assert!(ensure_available(2, Series::Words).is_ok());
        assert!(ensure_available(1, Series::Kanji).is_ok());
    }
}
