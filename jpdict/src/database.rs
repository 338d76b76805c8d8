use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jpdict_download::manifest::{self, Manifest};
use jpdict_download::stream::{DEFAULT_MAX_PROGRESS_RESOLUTION, DEFAULT_STALL_TIMEOUT};
use jpdict_parse::{KanjiCodec, NameCodec, RadicalCodec, WordCodec};
use jpdict_store::{
    KanjiSeries, NameSeries, RadicalSeries, Store, WordSeries, CURRENT_SCHEMA_VERSION,
    DEFAULT_BATCH_SIZE,
};
use jpdict_sync::{self, Action, InFlightRegistry, SyncError, UpdateState};
use jpdict_types::{KanjiRecord, KanjiResult, NameQueryResult, Series, SeriesSet};
use tokio::sync::{broadcast, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::Error;
use crate::events::ChangeEvent;
use crate::kanji::{self, RadicalCache};
use crate::names;
use crate::status::{DatabaseState, SeriesStatus};

/// The major manifest version this build is coded against, used when a
/// series has never been synced before (spec.md §4.5's `update({series?,
/// lang})` has no major-version parameter; a real consumer upgrading to a
/// new major would ship a new build with a bumped constant — see
/// `DESIGN.md`).
const DEFAULT_MAJOR: u32 = 1;

/// Outcome a joined (non-leading) `update()` call receives once the lead
/// caller's update finishes, rendered to a string since the real [`Error`]
/// carries non-`Clone` sources (sled/bincode errors) that can't be replayed
/// to every waiter as-is (spec.md §4.5 "new series are appended to its
/// queue and the current promise returned").
type SharedOutcome = Arc<Result<(), String>>;

struct InFlight {
    lang: String,
    token: CancellationToken,
    tx: broadcast::Sender<SharedOutcome>,
}

enum JoinOrLead {
    Lead(CancellationToken, broadcast::Sender<SharedOutcome>),
    Join(broadcast::Receiver<SharedOutcome>),
}

/// Tunables that used to be crate-wide constants, now exposed so a `Config`
/// layer (see `jpdict-cli`) can override them per deployment (SPEC_FULL.md
/// §1 "Configuration"). [`Default`] reproduces the previous hardcoded
/// behavior.
#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    pub schema_version: u32,
    pub max_progress_resolution: f64,
    pub batch_size: usize,
    pub stall_timeout: Duration,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            max_progress_resolution: DEFAULT_MAX_PROGRESS_RESOLUTION,
            batch_size: DEFAULT_BATCH_SIZE,
            stall_timeout: DEFAULT_STALL_TIMEOUT,
        }
    }
}

/// Single public entry point over the Store (spec.md §4.5): owns the
/// embedded store, serializes/coalesces per-series updates, and layers
/// radical/component/related-kanji resolution on top of raw records.
pub struct Database {
    store: Store,
    client: reqwest::Client,
    base_url: String,
    options: DatabaseOptions,
    registry: InFlightRegistry,
    manifests: Mutex<HashMap<String, Manifest>>,
    in_progress: Mutex<HashMap<Series, InFlight>>,
    radical_cache: RwLock<Option<Arc<RadicalCache>>>,
    statuses: Mutex<HashMap<Series, SeriesStatus>>,
    change_tx: broadcast::Sender<ChangeEvent>,
}

impl Database {
    pub async fn open(path: &Path, base_url: impl Into<String>) -> Result<Self, Error> {
        Self::open_with_options(path, base_url, DatabaseOptions::default()).await
    }

    pub async fn open_with_options(
        path: &Path,
        base_url: impl Into<String>,
        options: DatabaseOptions,
    ) -> Result<Self, Error> {
        let store = Store::open(path, options.schema_version, options.batch_size).await?;
        let mut statuses = HashMap::new();
        for series in Series::ALL {
            let version = store.get_data_version(series)?;
            statuses.insert(
                series,
                SeriesStatus::from_version(version, UpdateState::initial()),
            );
        }
        let (change_tx, _rx) = broadcast::channel(64);
        Ok(Self {
            store,
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            options,
            registry: InFlightRegistry::new(),
            manifests: Mutex::new(HashMap::new()),
            in_progress: Mutex::new(HashMap::new()),
            radical_cache: RwLock::new(None),
            statuses: Mutex::new(statuses),
            change_tx,
        })
    }

    pub async fn close(&self) {
        self.store.close().await;
    }

    /// Cancels every in-flight update, then removes the store (spec.md §5
    /// "`destroy()` cancels all in-flight updates, awaits their
    /// termination, then removes the store").
    pub async fn destroy(self) -> Result<(), Error> {
        self.cancel_update(None).await;
        self.store.destroy().await?;
        let _ = self.change_tx.send(ChangeEvent::Deleted);
        Ok(())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.change_tx.subscribe()
    }

    pub fn status(&self, series: Series) -> SeriesStatus {
        self.statuses
            .lock()
            .expect("status mutex poisoned")
            .get(&series)
            .cloned()
            .unwrap_or_else(SeriesStatus::initial)
    }

    /// Signals the Applier for `series` (or every in-flight series, when
    /// `None`) to stop at its next suspension point (spec.md §4.5
    /// `cancelUpdate`).
    pub async fn cancel_update(&self, series: Option<Series>) {
        let tokens: Vec<CancellationToken> = {
            let mut in_progress = self.in_progress.lock().expect("in_progress mutex poisoned");
            let targets: Vec<Series> = match series {
                Some(s) => vec![s],
                None => in_progress.keys().copied().collect(),
            };
            targets
                .into_iter()
                .filter_map(|s| in_progress.remove(&s))
                .map(|entry| entry.token)
                .collect()
        };
        for token in tokens {
            token.cancel();
        }
    }

    async fn manifest_for(&self, lang: &str, force_fetch: bool) -> Result<Manifest, Error> {
        if !force_fetch {
            if let Some(m) = self.manifests.lock().expect("manifest mutex poisoned").get(lang) {
                return Ok(m.clone());
            }
        }
        let fetched = manifest::fetch(&self.client, &self.base_url, lang).await?;
        self.manifests
            .lock()
            .expect("manifest mutex poisoned")
            .insert(lang.to_string(), fetched.clone());
        Ok(fetched)
    }

    /// Updates the requested series (defaulting to {kanji, radicals}, with
    /// radicals implied whenever kanji is requested) against the cached
    /// manifest for `lang`.
    pub async fn update(&self, series: Option<SeriesSet>, lang: &str) -> Result<(), Error> {
        self.update_inner(series, lang, false).await
    }

    /// Like [`Self::update`], but bypasses the in-memory manifest cache
    /// (spec.md §4.2 step 1 `forceFetch`).
    pub async fn force_update(&self, series: Option<SeriesSet>, lang: &str) -> Result<(), Error> {
        self.update_inner(series, lang, true).await
    }

    async fn update_inner(
        &self,
        series: Option<SeriesSet>,
        lang: &str,
        force_fetch: bool,
    ) -> Result<(), Error> {
        let set = series.unwrap_or_else(SeriesSet::default_set).normalized();
        let manifest = self.manifest_for(lang, force_fetch).await?;

        for candidate in Series::ALL {
            if !set.contains(candidate) {
                continue;
            }
            self.update_one(candidate, lang, &manifest).await?;
        }
        Ok(())
    }

    /// Runs (or joins) an update for a single series. Two concurrent calls
    /// for the same `(series, lang)` share one Applier run: the first
    /// caller leads and the rest await its outcome (spec.md §4.5 "new
    /// series are appended to its queue and the current promise returned").
    /// A call for a *different* lang preempts the in-flight one instead.
    async fn update_one(&self, series: Series, lang: &str, manifest: &Manifest) -> Result<(), Error> {
        let (token, tx) = match self.join_or_lead(series, lang) {
            JoinOrLead::Lead(token, tx) => (token, tx),
            JoinOrLead::Join(mut rx) => {
                return match rx.recv().await {
                    Ok(shared) => match &*shared {
                        Ok(()) => Ok(()),
                        Err(msg) => Err(Error::Shared(msg.clone())),
                    },
                    Err(_) => Err(SyncError::OverlappingUpdate.into()),
                };
            }
        };

        self.fold_action(series, Action::Start);
        let start_time = now_millis();

        let outcome = self.run_update(series, lang, manifest, &token, start_time).await;

        self.in_progress
            .lock()
            .expect("in_progress mutex poisoned")
            .remove(&series);

        let shared: SharedOutcome = Arc::new(outcome.as_ref().map(|_| ()).map_err(|e| e.to_string()));
        let _ = tx.send(shared);
        outcome
    }

    /// The leader's actual apply-and-record-outcome work, factored out so
    /// every return path (success, apply error, or a store read failing
    /// outright) still reaches `update_one`'s cleanup-and-broadcast step.
    async fn run_update(
        &self,
        series: Series,
        lang: &str,
        manifest: &Manifest,
        token: &CancellationToken,
        start_time: u64,
    ) -> Result<(), Error> {
        let version_before = self.store.get_data_version(series)?;
        let major = version_before
            .as_ref()
            .map(|v| v.major)
            .unwrap_or(DEFAULT_MAJOR);

        let result = dispatch_apply(
            series,
            &self.store,
            &self.registry,
            &self.client,
            &self.base_url,
            lang,
            major,
            manifest,
            self.options.max_progress_resolution,
            self.options.stall_timeout,
            token,
            |action| self.fold_action(series, action),
        )
        .await;

        let version_after = self.store.get_data_version(series)?;
        let committed = version_after != version_before;

        if series == Series::Radicals && committed {
            *self.radical_cache.write().await = None;
        }

        match result {
            Ok(()) => {
                self.fold_action(series, Action::Finish { check_date: start_time });
                self.set_status(series, DatabaseState::Ok, version_after);
                info!(%series, "update finished");
                Ok(())
            }
            Err(e) => {
                let check_date = committed.then_some(start_time);
                self.fold_action(series, Action::Error { check_date });
                let state = match &e {
                    SyncError::Store(jpdict_store::StoreError::Unavailable(_)) => {
                        DatabaseState::Unavailable
                    }
                    _ if version_after.is_some() => DatabaseState::Ok,
                    _ => DatabaseState::Empty,
                };
                self.set_status(series, state, version_after);
                Err(Error::from(e))
            }
        }
    }

    /// Either becomes the lead for `(series, lang)` (inserting a fresh
    /// in-flight entry) or, if one is already running for the same lang,
    /// returns a receiver that resolves once the lead finishes. A request
    /// for a different lang cancels the existing run and takes over.
    fn join_or_lead(&self, series: Series, lang: &str) -> JoinOrLead {
        let mut in_progress = self.in_progress.lock().expect("in_progress mutex poisoned");
        if let Some(existing) = in_progress.get(&series) {
            if existing.lang == lang {
                return JoinOrLead::Join(existing.tx.subscribe());
            }
            existing.token.cancel();
        }
        let token = CancellationToken::new();
        let (tx, _rx) = broadcast::channel(1);
        in_progress.insert(
            series,
            InFlight { lang: lang.to_string(), token: token.clone(), tx: tx.clone() },
        );
        JoinOrLead::Lead(token, tx)
    }

    fn fold_action(&self, series: Series, action: Action) {
        let mut statuses = self.statuses.lock().expect("status mutex poisoned");
        let status = statuses.entry(series).or_insert_with(SeriesStatus::initial);
        status.update_state = jpdict_sync::reduce(status.update_state.clone(), action);
        drop(statuses);
        let _ = self.change_tx.send(ChangeEvent::StateUpdated { series });
    }

    fn set_status(&self, series: Series, state: DatabaseState, version: Option<jpdict_types::Version>) {
        let mut statuses = self.statuses.lock().expect("status mutex poisoned");
        let status = statuses.entry(series).or_insert_with(SeriesStatus::initial);
        status.state = state;
        status.version = version;
    }

    async fn radical_cache(&self) -> Result<Arc<RadicalCache>, Error> {
        if let Some(cache) = self.radical_cache.read().await.clone() {
            return Ok(cache);
        }
        if self.store.get_data_version(Series::Radicals)?.is_none() {
            return Err(Error::RadicalsNotSynced);
        }
        let mut guard = self.radical_cache.write().await;
        if let Some(cache) = guard.clone() {
            return Ok(cache);
        }
        let radicals = self.store.scan_all::<RadicalSeries>()?;
        let cache = Arc::new(RadicalCache::build(radicals));
        *guard = Some(cache.clone());
        Ok(cache)
    }

    /// `getKanji` (spec.md §4.5): resolves radical and component
    /// cross-references, plus `cf` expansion, on top of the raw kanji
    /// records.
    pub async fn get_kanji(&self, chars: &[char], lang: &str) -> Result<Vec<KanjiResult>, Error> {
        let code_points: Vec<u32> = chars.iter().map(|&c| c as u32).collect();
        let records = self.store.get_records::<KanjiSeries>(&code_points)?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let cache = self.radical_cache().await?;

        let mut candidate_chars: HashSet<char> = HashSet::new();
        for record in &records {
            for c in record.comp.chars() {
                if cache.radical_for_char(c).is_none() {
                    candidate_chars.insert(c);
                }
            }
        }
        let candidate_codepoints: Vec<u32> = candidate_chars.into_iter().map(|c| c as u32).collect();
        let component_kanji = self.store.get_records::<KanjiSeries>(&candidate_codepoints)?;
        let kanji_by_char: HashMap<char, KanjiRecord> = component_kanji
            .into_iter()
            .filter_map(|k| k.char().map(|c| (c, k)))
            .collect();

        let mut cf_ids: HashSet<u32> = HashSet::new();
        for record in &records {
            cf_ids.extend(record.cf.iter().copied());
        }
        let cf_list: Vec<u32> = cf_ids.into_iter().collect();
        let cf_records = self.store.get_records::<KanjiSeries>(&cf_list)?;
        let cf_by_id: HashMap<u32, KanjiRecord> =
            cf_records.into_iter().map(|k| (k.c, k)).collect();

        let mut out = Vec::with_capacity(records.len());
        for record in &records {
            let related: Vec<KanjiRecord> = record
                .cf
                .iter()
                .filter_map(|id| cf_by_id.get(id).cloned())
                .collect();
            if let Some(result) = kanji::resolve(record, &cache, &kanji_by_char, related, lang) {
                out.push(result);
            }
        }
        Ok(out)
    }

    /// `getNames` (spec.md §4.5): the ranked-union algorithm itself lives
    /// in the Store (spec.md §4.1 agrees), so this forwards verbatim.
    pub fn get_names(&self, query: &str) -> Result<NameQueryResult, Error> {
        Ok(names::forward(self.store.get_names(query)?))
    }
}

#[allow(clippy::too_many_arguments)]
async fn dispatch_apply(
    series: Series,
    store: &Store,
    registry: &InFlightRegistry,
    client: &reqwest::Client,
    base_url: &str,
    lang: &str,
    major: u32,
    manifest: &Manifest,
    max_progress_resolution: f64,
    stall_timeout: Duration,
    cancel: &CancellationToken,
    on_action: impl FnMut(Action),
) -> Result<(), SyncError> {
    match series {
        Series::Kanji => {
            jpdict_sync::apply_update::<KanjiCodec, KanjiSeries>(
                store, registry, client, base_url, lang, major, manifest,
                max_progress_resolution, stall_timeout, cancel, on_action,
            )
            .await
        }
        Series::Radicals => {
            jpdict_sync::apply_update::<RadicalCodec, RadicalSeries>(
                store, registry, client, base_url, lang, major, manifest,
                max_progress_resolution, stall_timeout, cancel, on_action,
            )
            .await
        }
        Series::Names => {
            jpdict_sync::apply_update::<NameCodec, NameSeries>(
                store, registry, client, base_url, lang, major, manifest,
                max_progress_resolution, stall_timeout, cancel, on_action,
            )
            .await
        }
        Series::Words => {
            jpdict_sync::apply_update::<WordCodec, WordSeries>(
                store, registry, client, base_url, lang, major, manifest,
                max_progress_resolution, stall_timeout, cancel, on_action,
            )
            .await
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
