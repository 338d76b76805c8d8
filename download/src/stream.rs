use std::time::Duration;

use futures_util::StreamExt;
use jpdict_parse::{header, HeaderLine, LineSplitter};
use jpdict_types::Series;
use tokio_util::sync::CancellationToken;

use crate::error::DownloadError;
use crate::event::DownloadEvent;
use crate::plan::{FileRequest, FileType};

/// Default "abort if no bytes arrive within this long" watchdog (spec.md §5
/// "Timeouts"), used unless a caller's `Config::stall_timeout` overrides it.
pub const DEFAULT_STALL_TIMEOUT: Duration = Duration::from_secs(20);

/// Default ratio step between progress ticks (spec.md §4.2 step 8).
pub const DEFAULT_MAX_PROGRESS_RESOLUTION: f64 = 0.05;

/// Builds the data-file URL (spec.md §6.2): `{series}-rc-{lang}-{M}.{m}.{p}-{full|patch}.ljson`.
pub fn data_file_url(
    base_url: &str,
    series: Series,
    lang: &str,
    major: u32,
    minor: u32,
    file: FileRequest,
) -> String {
    format!(
        "{base_url}{series}-rc-{lang}-{major}.{minor}.{}-{}.ljson",
        file.patch,
        file.file_type.as_url_segment()
    )
}

/// Streams one data file, emitting [`DownloadEvent`]s as lines complete.
/// `on_event` is called synchronously so the caller (jpdict-sync) can apply
/// entries incrementally without buffering the whole file, and may fail
/// (e.g. a caller-side protocol violation) — its error is propagated as-is,
/// aborting the stream at the next suspension point. Progress events carry
/// `loaded` = records read so far and `total` = the header's declared record
/// count, gated so a new tick fires only once `recordsRead / totalRecords`
/// has advanced by at least `max_progress_resolution` since the last tick
/// (spec.md §4.2 step 8).
#[allow(clippy::too_many_arguments)]
pub async fn stream_file(
    client: &reqwest::Client,
    url: &str,
    major: u32,
    minor: u32,
    patch: u32,
    file_type: FileType,
    max_progress_resolution: f64,
    stall_timeout: Duration,
    cancel: &CancellationToken,
    mut on_event: impl FnMut(DownloadEvent) -> Result<(), DownloadError>,
) -> Result<(), DownloadError> {
    let response = client.get(url).send().await.map_err(|e| {
        if e.is_connect() || e.is_timeout() {
            DownloadError::DataFileNotAccessible {
                url: url.to_string(),
                status: None,
            }
        } else {
            DownloadError::DataFileNotAccessible {
                url: url.to_string(),
                status: e.status().map(|s| s.as_u16()),
            }
        }
    })?;

    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Err(DownloadError::DataFileNotFound {
            url: url.to_string(),
        });
    }
    if !response.status().is_success() {
        return Err(DownloadError::DataFileNotAccessible {
            url: url.to_string(),
            status: Some(response.status().as_u16()),
        });
    }

    let mut stream = response.bytes_stream();
    let mut splitter = LineSplitter::new();
    let mut line_no = 0u64;
    let mut seen_header = false;
    let mut saw_any_bytes = false;
    let mut total_records: Option<u64> = None;
    let mut records_read = 0u64;
    let mut last_emitted_ratio = 0.0f64;

    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(DownloadError::Cancelled),
            chunk = tokio::time::timeout(stall_timeout, stream.next()) => chunk,
        };

        let chunk = match next {
            Ok(Some(chunk)) => chunk.map_err(|e| DownloadError::DataFileNotAccessible {
                url: url.to_string(),
                status: e.status().map(|s| s.as_u16()),
            })?,
            Ok(None) => break,
            Err(_elapsed) => {
                return Err(DownloadError::DataFileNotAccessible {
                    url: url.to_string(),
                    status: None,
                })
            }
        };

        if chunk.is_empty() {
            continue;
        }
        saw_any_bytes = true;

        for line in splitter.feed(&chunk)? {
            line_no += 1;
            handle_line(
                &line,
                line_no,
                major,
                minor,
                patch,
                file_type,
                &mut seen_header,
                &mut total_records,
                &mut records_read,
                &mut on_event,
            )?;
        }
        maybe_emit_progress(
            records_read,
            total_records,
            max_progress_resolution,
            &mut last_emitted_ratio,
            &mut on_event,
        )?;
    }

    if let Some(line) = splitter.finish()? {
        line_no += 1;
        handle_line(
            &line,
            line_no,
            major,
            minor,
            patch,
            file_type,
            &mut seen_header,
            &mut total_records,
            &mut records_read,
            &mut on_event,
        )?;
        maybe_emit_progress(
            records_read,
            total_records,
            max_progress_resolution,
            &mut last_emitted_ratio,
            &mut on_event,
        )?;
    }

    if !saw_any_bytes {
        return Err(DownloadError::DataFileNotAccessible {
            url: url.to_string(),
            status: None,
        });
    }
    if !seen_header {
        return Err(DownloadError::Protocol(jpdict_parse::ParseError::HeaderMissing));
    }

    on_event(DownloadEvent::VersionEnd)
}

/// Emits a progress tick only once the `recordsRead / totalRecords` ratio
/// has advanced by at least `max_progress_resolution` since the last tick
/// (spec.md §4.2 step 8).
fn maybe_emit_progress(
    records_read: u64,
    total_records: Option<u64>,
    max_progress_resolution: f64,
    last_emitted_ratio: &mut f64,
    on_event: &mut impl FnMut(DownloadEvent) -> Result<(), DownloadError>,
) -> Result<(), DownloadError> {
    let Some(total) = total_records.filter(|t| *t > 0) else {
        return Ok(());
    };
    let ratio = records_read as f64 / total as f64;
    if ratio - *last_emitted_ratio >= max_progress_resolution || records_read == total {
        *last_emitted_ratio = ratio;
        on_event(DownloadEvent::Progress {
            loaded: records_read,
            total: Some(total),
        })?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn handle_line(
    line: &str,
    line_no: u64,
    major: u32,
    minor: u32,
    patch: u32,
    file_type: FileType,
    seen_header: &mut bool,
    total_records: &mut Option<u64>,
    records_read: &mut u64,
    on_event: &mut impl FnMut(DownloadEvent) -> Result<(), DownloadError>,
) -> Result<(), DownloadError> {
    let value: serde_json::Value = serde_json::from_str(line).map_err(|source| {
        jpdict_parse::ParseError::InvalidJson {
            line: line_no,
            source,
        }
    })?;

    if HeaderLine::is_header_shaped(&value) {
        if *seen_header {
            return Err(jpdict_parse::ParseError::DuplicateHeader {
                after_line: line_no - 1,
            }
            .into());
        }
        let header: HeaderLine = serde_json::from_value(value).map_err(|source| {
            jpdict_parse::ParseError::InvalidJson {
                line: line_no,
                source,
            }
        })?;
        if header.version.triple() != (major, minor, patch) {
            return Err(jpdict_parse::ParseError::VersionMismatch {
                header: header.version.triple(),
                url: (major, minor, patch),
            }
            .into());
        }
        *seen_header = true;
        *total_records = Some(header.records);
        return on_event(DownloadEvent::Version {
            header: header.version,
            partial: file_type == FileType::Patch,
        });
    }

    if !*seen_header {
        return Err(jpdict_parse::ParseError::HeaderMissing.into());
    }

    if header::is_deletion_shaped(&value) {
        if file_type == FileType::Full {
            return Err(jpdict_parse::ParseError::DeletionInSnapshot { line: line_no }.into());
        }
        *records_read += 1;
        on_event(DownloadEvent::Deletion(value))
    } else {
        *records_read += 1;
        on_event(DownloadEvent::Entry(value))
    }
}
