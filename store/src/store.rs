use std::sync::Arc;

use jpdict_types::{Series, Version};
use sled::transaction::Transactional;
use tracing::{debug, info};

use crate::envelope::{self, Envelope};
use crate::error::StoreError;
use crate::generation;
use crate::index_key;
use crate::lifecycle::{Lifecycle, State};
use crate::progress::{Progress, ProgressFn};
use crate::schema;
use crate::series_trait::StoreSeries;

/// Default batch size for [`Store::bulk_update`]'s put-chunking (spec.md
/// §4.1 "progress reporting": "batches of ~4000"), used unless a caller's
/// `Config::batch_size` overrides it.
pub const DEFAULT_BATCH_SIZE: usize = 4000;

/// What a [`Store::bulk_update`] should do with existing rows before
/// applying `puts`: replace the whole series (a fresh snapshot) or remove
/// only the listed ids (a patch's deletion lines).
#[derive(Debug, Clone)]
pub enum DropSpec<K> {
    All,
    Ids(Vec<K>),
}

pub struct Store {
    db: sled::Db,
    meta: sled::Tree,
    version: sled::Tree,
    lifecycle: Arc<Lifecycle>,
    batch_size: usize,
}

impl Store {
    /// Opens (creating if absent) the embedded store at `path`, migrating
    /// its schema up to `schema_version` (spec.md §4.1 "schema version is
    /// embedded in the open call"). `batch_size` governs how many `put`
    /// records [`Store::bulk_update`] writes before each `on_progress` tick.
    ///
    /// If another handle already holds `path` open, sled's directory lock
    /// fails acquisition and this returns [`StoreError::Blocking`] with the
    /// lifecycle settled back to `idle` rather than `error` (spec.md §4.1
    /// "Blocking semantics": "the opener may receive a `blocking` signal; it
    /// must close its own handle and return to `idle`").
    pub async fn open(
        path: &std::path::Path,
        schema_version: u32,
        batch_size: usize,
    ) -> Result<Self, StoreError> {
        let lifecycle = Arc::new(Lifecycle::new());
        lifecycle.set(State::Opening);
        let db = match sled::open(path) {
            Ok(db) => db,
            Err(e) if is_locked(&e) => {
                lifecycle.set(State::Idle);
                return Err(StoreError::Blocking);
            }
            Err(e) => {
                lifecycle.set(State::Error);
                return Err(StoreError::from(e));
            }
        };
        let meta = db.open_tree("meta")?;
        let version = db.open_tree("version")?;
        if let Err(e) = schema::open_or_init(&meta, schema_version) {
            lifecycle.set(State::Error);
            return Err(e);
        }
        lifecycle.set(State::Open);
        info!(path = %path.display(), "store opened");
        Ok(Self {
            db,
            meta,
            version,
            lifecycle,
            batch_size,
        })
    }

    pub async fn close(&self) {
        self.lifecycle.set(State::Idle);
        let _ = self.db.flush_async().await;
    }

    /// Fully removes the on-disk store, including every abandoned
    /// generation left behind by past full-table replaces.
    pub async fn destroy(self) -> Result<(), StoreError> {
        self.lifecycle.set(State::Deleting);
        let path = self.db.path().to_path_buf();
        drop(self.db);
        std::fs::remove_dir_all(&path).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        self.lifecycle.set(State::Idle);
        Ok(())
    }

    pub async fn settle(&self) -> State {
        self.lifecycle.settle().await
    }

    pub fn get_data_version(&self, series: Series) -> Result<Option<Version>, StoreError> {
        match self.version.get([series.table_id()])? {
            Some(bytes) => Ok(Some(
                bincode::deserialize(&bytes).map_err(StoreError::from)?,
            )),
            None => Ok(None),
        }
    }

    /// Writes `v` into the version tree, or deletes the version record
    /// entirely when `v` is absent (spec.md §4.1 bullet 3: `clearTable`'s
    /// `version=absent` must remove the stored version, not merely skip
    /// updating it).
    fn set_version_in_txn(
        version: &sled::transaction::TransactionalTree,
        series: Series,
        v: Option<&Version>,
    ) -> sled::transaction::ConflictableTransactionResult<(), StoreError> {
        match v {
            Some(v) => {
                let bytes = bincode::serialize(v)
                    .map_err(StoreError::from)
                    .map_err(sled::transaction::ConflictableTransactionError::Abort)?;
                version.insert(&[series.table_id()][..], bytes)?;
            }
            None => {
                version.remove(&[series.table_id()][..])?;
            }
        }
        Ok(())
    }

    fn current_trees<S: StoreSeries>(&self) -> Result<(sled::Tree, sled::Tree, u64), StoreError> {
        let gen = generation::current(&self.meta, S::SERIES)?;
        let data = self
            .db
            .open_tree(generation::data_tree_name(S::SERIES, gen))?;
        let index = self
            .db
            .open_tree(generation::index_tree_name(S::SERIES, gen))?;
        Ok((data, index, gen))
    }

    pub fn get_record<S: StoreSeries>(&self, key: &S::Key) -> Result<Option<S::Record>, StoreError> {
        let schema_version = schema::current(&self.meta)?;
        schema::ensure_available(schema_version, S::SERIES)?;
        let (data, _, _) = self.current_trees::<S>()?;
        match data.get(S::key_bytes(key))? {
            Some(bytes) => {
                let env: Envelope<S::Record> = envelope::decode(&bytes)?;
                Ok(Some(env.record))
            }
            None => Ok(None),
        }
    }

    pub fn get_records<S: StoreSeries>(&self, keys: &[S::Key]) -> Result<Vec<S::Record>, StoreError> {
        keys.iter()
            .filter_map(|k| self.get_record::<S>(k).transpose())
            .collect()
    }

    /// Exact-match secondary-index lookup: every record that registered
    /// `value` under `tag`, in index insertion order.
    pub fn lookup_by_index<S: StoreSeries>(
        &self,
        tag: u8,
        value: &str,
    ) -> Result<Vec<S::Record>, StoreError> {
        let (data, index, _) = self.current_trees::<S>()?;
        let prefix = index_key::prefix(tag, value);
        let mut out = Vec::new();
        for kv in index.scan_prefix(&prefix) {
            let (full_key, _) = kv?;
            if let Some(primary) = index_key::primary_suffix(&full_key, tag, value) {
                if let Some(bytes) = data.get(primary)? {
                    let env: Envelope<S::Record> = envelope::decode(&bytes)?;
                    out.push(env.record);
                }
            }
        }
        Ok(out)
    }

    /// Every record in a series, in ascending primary-key order (spec.md §9
    /// "the char-to-radical map is built once... purely derived" — the
    /// facade's radical cache and `charToRadicalId` map are built this way
    /// rather than through a secondary index).
    pub fn scan_all<S: StoreSeries>(&self) -> Result<Vec<S::Record>, StoreError> {
        let schema_version = schema::current(&self.meta)?;
        schema::ensure_available(schema_version, S::SERIES)?;
        let (data, _, _) = self.current_trees::<S>()?;
        let mut out = Vec::new();
        for kv in data.iter() {
            let (_, bytes) = kv?;
            let env: Envelope<S::Record> = envelope::decode(&bytes)?;
            out.push(env.record);
        }
        Ok(out)
    }

    /// Name lookup (spec.md §4.1 `getNames`): exact matches against the
    /// kanji-spelling and reading indexes, unioned in insertion order with
    /// kanji matches first, plus kana-equivalent matches from the derived
    /// hiragana index when the normalized query contains at least one
    /// hiragana character. Exact matches always outrank kana-equivalent ones
    /// (spec.md §4.5, §8).
    pub fn get_names(
        &self,
        query: &str,
    ) -> Result<jpdict_types::NameQueryResult, StoreError> {
        use crate::series::name::{TAG_HIRAGANA, TAG_KANJI, TAG_READING};
        use crate::series_trait::NameSeries;
        use jpdict_types::{MatchRank, NameQueryResult, RankedName};
        use std::collections::HashSet;

        let mut seen: HashSet<u32> = HashSet::new();
        let mut matches = Vec::new();

        for record in self.lookup_by_index::<NameSeries>(TAG_KANJI, query)? {
            if seen.insert(record.id) {
                matches.push(RankedName {
                    rank: MatchRank::Exact,
                    record,
                });
            }
        }
        for record in self.lookup_by_index::<NameSeries>(TAG_READING, query)? {
            if seen.insert(record.id) {
                matches.push(RankedName {
                    rank: MatchRank::Exact,
                    record,
                });
            }
        }

        let normalized = jpdict_parse::katakana_to_hiragana(query);
        if jpdict_parse::contains_hiragana(&normalized) {
            for record in self.lookup_by_index::<NameSeries>(TAG_HIRAGANA, &normalized)? {
                if seen.insert(record.id) {
                    matches.push(RankedName {
                        rank: MatchRank::KanaEquivalent,
                        record,
                    });
                }
            }
        }

        Ok(NameQueryResult { matches })
    }

    /// Replaces or patches a series' contents in one logical operation
    /// (spec.md §4.1 "bulk update"). `drop` is applied before `puts`; both
    /// counts feed the `total` reported to `on_progress`. `version` is
    /// recorded as the series' new data version, or deleted entirely when
    /// absent.
    pub async fn bulk_update<S: StoreSeries>(
        &self,
        drop: DropSpec<S::Key>,
        puts: Vec<S::Record>,
        version: Option<Version>,
        mut on_progress: Option<ProgressFn<'_>>,
    ) -> Result<(), StoreError> {
        match drop {
            DropSpec::All => self.replace_all::<S>(puts, version, on_progress.as_deref_mut()).await,
            DropSpec::Ids(ids) => self.patch::<S>(ids, puts, version, on_progress.as_deref_mut()),
        }
    }

    /// `clearTable(series)` (spec.md §4.1): equivalent to
    /// `bulkUpdateTable(series, put=∅, drop='*', version=absent)`, wiping
    /// both the series' data and its recorded version.
    pub async fn clear_table<S: StoreSeries>(&self) -> Result<(), StoreError> {
        self.bulk_update::<S>(DropSpec::All, Vec::new(), None, None).await
    }

    async fn replace_all<S: StoreSeries>(
        &self,
        puts: Vec<S::Record>,
        version: Option<Version>,
        mut on_progress: Option<&mut (dyn FnMut(Progress) + Send)>,
    ) -> Result<(), StoreError> {
        let total = puts.len() as u64;
        let old_gen = generation::current(&self.meta, S::SERIES)?;
        let new_gen = old_gen + 1;
        let data = self
            .db
            .open_tree(generation::data_tree_name(S::SERIES, new_gen))?;
        let index = self
            .db
            .open_tree(generation::index_tree_name(S::SERIES, new_gen))?;

        let mut processed = 0u64;
        for chunk in puts.chunks(self.batch_size) {
            for record in chunk {
                let primary = S::primary_key(record);
                let index_entries = S::index_entries(record);
                let index_keys: Vec<Vec<u8>> = index_entries
                    .iter()
                    .map(|(tag, value)| index_key::encode(*tag, value, &primary))
                    .collect();
                for key in &index_keys {
                    index.insert(key, &[])?;
                }
                let env = Envelope {
                    record: record.clone(),
                    index_keys,
                };
                data.insert(primary, envelope::encode(&env)?)?;
            }
            processed += chunk.len() as u64;
            if let Some(cb) = on_progress.as_mut() {
                cb(Progress { processed, total });
            }
        }
        data.flush_async().await?;
        index.flush_async().await?;

        let meta = &self.meta;
        let version_tree = &self.version;
        (meta, version_tree)
            .transaction(|(meta, version_tree)| {
                generation::bump_in_txn(meta, S::SERIES, new_gen)?;
                Self::set_version_in_txn(version_tree, S::SERIES, version.as_ref())?;
                Ok(())
            })
            .map_err(StoreError::from)?;

        schema::record_migration(&self.meta, S::SERIES)?;
        debug!(series = %S::SERIES, generation = new_gen, total, "full replace committed");
        Ok(())
    }

    fn patch<S: StoreSeries>(
        &self,
        ids: Vec<S::Key>,
        puts: Vec<S::Record>,
        version: Option<Version>,
        on_progress: Option<&mut (dyn FnMut(Progress) + Send)>,
    ) -> Result<(), StoreError> {
        let total = (ids.len() + puts.len()) as u64;
        let (data, index, _gen) = self.current_trees::<S>()?;
        let version_tree = &self.version;

        // `transaction`'s closure must be `Fn` since sled may retry it on
        // conflict, but `on_progress` is `FnMut` — a `RefCell` lets the
        // closure stay `Fn` while still ticking the callback per chunk.
        let on_progress = std::cell::RefCell::new(on_progress);
        let batch_size = self.batch_size;

        (&data, &index, version_tree)
            .transaction(|(data, index, version_tree)| {
                let mut processed = 0u64;
                for id_chunk in ids.chunks(batch_size) {
                    for id in id_chunk {
                        let key = S::key_bytes(id);
                        if let Some(bytes) = data.remove(key.clone())? {
                            let env: Envelope<S::Record> = envelope::decode(&bytes)
                                .map_err(sled::transaction::ConflictableTransactionError::Abort)?;
                            for ik in &env.index_keys {
                                index.remove(ik.clone())?;
                            }
                        }
                    }
                    processed += id_chunk.len() as u64;
                    if let Some(cb) = on_progress.borrow_mut().as_mut() {
                        cb(Progress { processed, total });
                    }
                }
                for put_chunk in puts.chunks(batch_size) {
                    for record in put_chunk {
                        let primary = S::primary_key(record);
                        if let Some(bytes) = data.get(&primary)? {
                            let old: Envelope<S::Record> = envelope::decode(&bytes)
                                .map_err(sled::transaction::ConflictableTransactionError::Abort)?;
                            for ik in &old.index_keys {
                                index.remove(ik.clone())?;
                            }
                        }
                        let index_entries = S::index_entries(record);
                        let index_keys: Vec<Vec<u8>> = index_entries
                            .iter()
                            .map(|(tag, value)| index_key::encode(*tag, value, &primary))
                            .collect();
                        for key in &index_keys {
                            index.insert(key.clone(), &[][..])?;
                        }
                        let env = Envelope {
                            record: record.clone(),
                            index_keys,
                        };
                        let encoded = envelope::encode(&env)
                            .map_err(sled::transaction::ConflictableTransactionError::Abort)?;
                        data.insert(primary, encoded)?;
                    }
                    processed += put_chunk.len() as u64;
                    if let Some(cb) = on_progress.borrow_mut().as_mut() {
                        cb(Progress { processed, total });
                    }
                }
                Self::set_version_in_txn(version_tree, S::SERIES, version.as_ref())?;
                Ok(())
            })
            .map_err(StoreError::from)?;

        schema::record_migration(&self.meta, S::SERIES)?;
        debug!(series = %S::SERIES, total, "patch committed");
        Ok(())
    }
}

/// Heuristic for "another handle already holds this path open": sled
/// surfaces lock contention as a plain IO error, so we look for the
/// wording its file-lock acquisition fails with. This only distinguishes
/// concurrent-open attempts within reach of the same lock file; it cannot
/// tell a stale lock from a genuinely live holder any better than sled
/// itself can (see DESIGN.md).
fn is_locked(e: &sled::Error) -> bool {
    if let sled::Error::Io(io_err) = e {
        let msg = io_err.to_string().to_lowercase();
        return msg.contains("lock") || io_err.kind() == std::io::ErrorKind::WouldBlock;
    }
    false
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.lifecycle.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series_trait::RadicalSeries;
    use jpdict_types::RadicalRecord;

    fn version(patch: u32) -> Version {
        Version {
            major: 1,
            minor: 0,
            patch,
            snapshot: None,
            database_version: None,
            date_of_creation: "2024-01-01".into(),
            lang: "en".into(),
        }
    }

    fn radical(id: &str, b: &str) -> RadicalRecord {
        RadicalRecord {
            id: id.to_string(),
            rad: 9,
            b: b.to_string(),
            k: None,
            r: vec![],
            m: vec![],
            pos: None,
        }
    }

    async fn open(dir: &tempfile::TempDir) -> Store {
        Store::open(dir.path(), schema::CURRENT_SCHEMA_VERSION, DEFAULT_BATCH_SIZE)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn replace_all_then_get_by_primary_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir).await;
        store
            .bulk_update::<RadicalSeries>(
                DropSpec::All,
                vec![radical("9", "⺅"), radical("30", "口")],
                Some(version(1)),
                None,
            )
            .await
            .unwrap();
        let got = store.get_record::<RadicalSeries>(&"9".to_string()).unwrap();
        assert_eq!(got.unwrap().b, "⺅");
        assert_eq!(
            store.get_data_version(Series::Radicals).unwrap().unwrap().patch,
            1
        );
    }

    #[tokio::test]
    async fn lookup_by_glyph_index_finds_the_radical() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir).await;
        store
            .bulk_update::<RadicalSeries>(DropSpec::All, vec![radical("9", "⺅")], Some(version(1)), None)
            .await
            .unwrap();
        let found = store
            .lookup_by_index::<RadicalSeries>(crate::series::radical::TAG_BASE, "⺅")
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "9");
    }

    #[tokio::test]
    async fn patch_deletes_and_overwrites_without_disturbing_others() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir).await;
        store
            .bulk_update::<RadicalSeries>(
                DropSpec::All,
                vec![radical("9", "⺅"), radical("30", "口")],
                Some(version(1)),
                None,
            )
            .await
            .unwrap();
        store
            .bulk_update::<RadicalSeries>(
                DropSpec::Ids(vec!["9".to_string()]),
                vec![radical("30", "口改")],
                Some(version(2)),
                None,
            )
            .await
            .unwrap();
        assert!(store.get_record::<RadicalSeries>(&"9".to_string()).unwrap().is_none());
        assert_eq!(
            store.get_record::<RadicalSeries>(&"30".to_string()).unwrap().unwrap().b,
            "口改"
        );
        let stale = store
            .lookup_by_index::<RadicalSeries>(crate::series::radical::TAG_BASE, "口")
            .unwrap();
        assert!(stale.is_empty());
    }

    #[tokio::test]
    async fn full_replace_is_invisible_until_committed() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir).await;
        store
            .bulk_update::<RadicalSeries>(DropSpec::All, vec![radical("9", "⺅")], Some(version(1)), None)
            .await
            .unwrap();
        store
            .bulk_update::<RadicalSeries>(DropSpec::All, vec![radical("30", "口")], Some(version(2)), None)
            .await
            .unwrap();
        assert!(store.get_record::<RadicalSeries>(&"9".to_string()).unwrap().is_none());
        assert!(store.get_record::<RadicalSeries>(&"30".to_string()).unwrap().is_some());
    }

    #[tokio::test]
    async fn scan_all_returns_every_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir).await;
        store
            .bulk_update::<RadicalSeries>(
                DropSpec::All,
                vec![radical("9", "⺅"), radical("30", "口")],
                Some(version(1)),
                None,
            )
            .await
            .unwrap();
        let mut all = store.scan_all::<RadicalSeries>().unwrap();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "30");
        assert_eq!(all[1].id, "9");
    }

    #[tokio::test]
    async fn get_names_ranks_exact_over_kana_equivalent() {
        use crate::series_trait::NameSeries;
        use jpdict_types::{MatchRank, NameRecord};

        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir).await;
        store
            .bulk_update::<NameSeries>(
                DropSpec::All,
                vec![
                    NameRecord {
                        id: 1,
                        k: vec!["中野".into()],
                        r: vec!["なかの".into()],
                        tr: vec![],
                    },
                    NameRecord {
                        id: 2,
                        k: vec![],
                        r: vec!["ナカノ".into()],
                        tr: vec![],
                    },
                ],
                Some(version(1)),
                None,
            )
            .await
            .unwrap();

        let result = store.get_names("なかの").unwrap();
        assert_eq!(result.matches.len(), 2);
        assert_eq!(result.matches[0].rank, MatchRank::Exact);
        assert_eq!(result.matches[0].record.id, 1);
        assert_eq!(result.matches[1].rank, MatchRank::KanaEquivalent);
        assert_eq!(result.matches[1].record.id, 2);
    }

    #[tokio::test]
    async fn clear_table_wipes_data_and_version() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir).await;
        store
            .bulk_update::<RadicalSeries>(DropSpec::All, vec![radical("9", "⺅")], Some(version(1)), None)
            .await
            .unwrap();
        store.clear_table::<RadicalSeries>().await.unwrap();
        assert!(store.get_record::<RadicalSeries>(&"9".to_string()).unwrap().is_none());
        assert!(store.get_data_version(Series::Radicals).unwrap().is_none());
    }

    #[tokio::test]
    async fn patch_reports_progress_per_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path(), schema::CURRENT_SCHEMA_VERSION, 1)
            .await
            .unwrap();
        let ticks: Arc<std::sync::Mutex<Vec<(u64, u64)>>> = Arc::new(std::sync::Mutex::new(Vec::new()));
        let ticks_for_first = ticks.clone();
        store
            .bulk_update::<RadicalSeries>(
                DropSpec::All,
                vec![radical("9", "⺅"), radical("30", "口")],
                Some(version(1)),
                Some(Box::new(move |p: Progress| {
                    ticks_for_first.lock().unwrap().push((p.processed, p.total))
                })),
            )
            .await
            .unwrap();
        ticks.lock().unwrap().clear();
        let ticks_for_second = ticks.clone();
        store
            .bulk_update::<RadicalSeries>(
                DropSpec::Ids(vec![]),
                vec![radical("9", "⺅改"), radical("30", "口改")],
                Some(version(2)),
                Some(Box::new(move |p: Progress| {
                    ticks_for_second.lock().unwrap().push((p.processed, p.total))
                })),
            )
            .await
            .unwrap();
        assert_eq!(*ticks.lock().unwrap(), vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn is_locked_recognizes_sled_lock_contention_wording() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "could not acquire lock on \"db\"");
        assert!(is_locked(&sled::Error::Io(io)));
        let unrelated = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        assert!(!is_locked(&sled::Error::Io(unrelated)));
    }
}
