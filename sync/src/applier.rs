use std::time::Duration;

use jpdict_download::plan::plan_files;
use jpdict_download::stream;
use jpdict_download::{DownloadError, DownloadEvent, FileRequest, FileType, Manifest};
use jpdict_parse::{ParseError, SeriesCodec};
use jpdict_store::{DropSpec, Store, StoreSeries};
use jpdict_types::Version;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::SyncError;
use crate::reducer::Action;
use crate::registry::InFlightRegistry;

/// Drives one series' update end-to-end (spec.md §4.3): resolves the
/// manifest entry, plans full-snapshot-vs-patch files, and for each file
/// streams events from the Downloader, accumulating `put[]`/`drop[]` until
/// the file's `versionend`, at which point it commits via
/// [`Store::bulk_update`] and moves on to the next file. Enforces "at most
/// one Applier per (store, series)" via `registry`.
#[allow(clippy::too_many_arguments)]
pub async fn apply_update<C, S>(
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
    mut on_action: impl FnMut(Action),
) -> Result<(), SyncError>
where
    C: SeriesCodec,
    S: StoreSeries<Record = C::Record, Key = C::Key>,
{
    let _guard = registry.try_acquire(S::SERIES)?;

    let current = store.get_data_version(S::SERIES)?;
    let entry = manifest.locate(S::SERIES, major)?;
    let files = plan_files(current.as_ref(), entry)?;

    if files.is_empty() {
        info!(series = %S::SERIES, "already current, nothing to download");
        return Ok(());
    }

    for file in files {
        if cancel.is_cancelled() {
            return Err(SyncError::Abort);
        }
        apply_one_file::<C, S>(
            store,
            client,
            base_url,
            lang,
            major,
            entry.minor,
            file,
            max_progress_resolution,
            stall_timeout,
            cancel,
            &mut on_action,
        )
        .await?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn apply_one_file<C, S>(
    store: &Store,
    client: &reqwest::Client,
    base_url: &str,
    lang: &str,
    major: u32,
    minor: u32,
    file: FileRequest,
    max_progress_resolution: f64,
    stall_timeout: Duration,
    cancel: &CancellationToken,
    on_action: &mut impl FnMut(Action),
) -> Result<(), SyncError>
where
    C: SeriesCodec,
    S: StoreSeries<Record = C::Record, Key = C::Key>,
{
    debug_assert_eq!(C::SERIES.table_id(), S::SERIES.table_id());

    let url = stream::data_file_url(base_url, S::SERIES, lang, major, minor, file);
    let mut put: Vec<C::Record> = Vec::new();
    let mut drop_ids: Vec<C::Key> = Vec::new();
    let mut current_version: Option<Version> = None;
    let mut line_no = 0u64;

    let stream_result = stream::stream_file(
        client,
        &url,
        major,
        minor,
        file.patch,
        file.file_type,
        max_progress_resolution,
        stall_timeout,
        cancel,
        |event| {
            line_no += 1;
            match event {
                DownloadEvent::Version { header, partial } => {
                    if current_version.is_some() {
                        return Err(DownloadError::Protocol(ParseError::DuplicateHeader {
                            after_line: line_no - 1,
                        }));
                    }
                    let version = header.with_lang(lang.to_string());
                    current_version = Some(version.clone());
                    debug_assert_eq!(partial, file.file_type == FileType::Patch);
                    on_action(Action::StartDownload { version });
                    Ok(())
                }
                DownloadEvent::Entry(value) => {
                    if !C::has_required_keys(&value) {
                        return Err(DownloadError::Protocol(ParseError::InvalidRecord {
                            line: line_no,
                            series: C::SERIES.name(),
                        }));
                    }
                    let record = C::to_record(value).map_err(|source| {
                        DownloadError::Protocol(ParseError::InvalidJson {
                            line: line_no,
                            source,
                        })
                    })?;
                    put.push(record);
                    Ok(())
                }
                DownloadEvent::Deletion(value) => {
                    let key = C::deletion_key(&value).ok_or_else(|| {
                        DownloadError::Protocol(ParseError::InvalidRecord {
                            line: line_no,
                            series: C::SERIES.name(),
                        })
                    })?;
                    drop_ids.push(key);
                    Ok(())
                }
                DownloadEvent::Progress { loaded, total } => {
                    on_action(Action::Progress { loaded, total });
                    Ok(())
                }
                DownloadEvent::VersionEnd => Ok(()),
            }
        },
    )
    .await;

    match stream_result {
        Ok(()) => {}
        Err(DownloadError::Cancelled) => return Err(SyncError::Abort),
        Err(e) => return Err(SyncError::Download(e)),
    }

    let version = current_version.ok_or(DownloadError::Protocol(ParseError::HeaderMissing))?;
    on_action(Action::FinishDownload {
        version: version.clone(),
    });

    let drop = if file.file_type == FileType::Patch {
        DropSpec::Ids(drop_ids)
    } else {
        DropSpec::All
    };

    store
        .bulk_update::<S>(drop, put, Some(version.clone()), None)
        .await?;

    on_action(Action::FinishPatch { version });
    Ok(())
}
