//! Minimal example binary exercising the jpdict facade end-to-end:
//! `update`, `getKanji`, and `getNames` against a local embedded store
//! (SPEC_FULL.md §0 "jpdict-cli"). Not a server — the core's Non-goals
//! (spec.md §1) exclude any user-facing shell beyond this.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use argparse::{ArgumentParser, Store, StoreTrue};
use jpdict::{Database, DatabaseOptions, Series, SeriesSet};

/// Runtime configuration (SPEC_FULL.md §1 "Configuration"), read from
/// environment variables with the library's own defaults as fallback.
struct Config {
    base_url: String,
    schema_version: u32,
    max_progress_resolution: f64,
    batch_size: usize,
    stall_timeout: Duration,
    data_dir: PathBuf,
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn get_config() -> Config {
    let defaults = DatabaseOptions::default();
    Config {
        base_url: std::env::var("JPDICT_BASE_URL")
            .unwrap_or_else(|_| "https://data.example.invalid/jpdict/".to_string()),
        schema_version: env_parsed("JPDICT_SCHEMA_VERSION", defaults.schema_version),
        max_progress_resolution: env_parsed(
            "JPDICT_MAX_PROGRESS_RESOLUTION",
            defaults.max_progress_resolution,
        ),
        batch_size: env_parsed("JPDICT_BATCH_SIZE", defaults.batch_size),
        stall_timeout: std::env::var("JPDICT_STALL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.stall_timeout),
        data_dir: std::env::var("JPDICT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./jpdict-data")),
    }
}

struct Args {
    lang: String,
    series: String,
    kanji: String,
    name_query: String,
    force_update: bool,
    skip_update: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        lang: "en".to_string(),
        series: "kanji,radicals".to_string(),
        kanji: String::new(),
        name_query: String::new(),
        force_update: false,
        skip_update: false,
    };
    {
        let mut parser = ArgumentParser::new();
        parser.set_description(
            "Sync and query a local mirror of the jpdict kanji/radical/name/word series.",
        );
        parser
            .refer(&mut args.lang)
            .add_option(&["--lang"], Store, "Language to sync/query (default: en)");
        parser.refer(&mut args.series).add_option(
            &["--series"],
            Store,
            "Comma-separated series to update: kanji,radicals,names,words",
        );
        parser.refer(&mut args.kanji).add_option(
            &["--kanji"],
            Store,
            "Look up one or more kanji characters after updating",
        );
        parser.refer(&mut args.name_query).add_option(
            &["--name"],
            Store,
            "Look up a name by kanji spelling or reading after updating",
        );
        parser.refer(&mut args.force_update).add_option(
            &["--force-update"],
            StoreTrue,
            "Bypass the in-memory manifest cache",
        );
        parser.refer(&mut args.skip_update).add_option(
            &["--skip-update"],
            StoreTrue,
            "Query the existing local store without syncing first",
        );
        parser.parse_args_or_exit();
    }
    args
}

fn parse_series_set(spec: &str) -> SeriesSet {
    let series = spec
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(Series::from_name)
        .collect();
    SeriesSet { series }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let config = get_config();
    let args = parse_args();

    let options = DatabaseOptions {
        schema_version: config.schema_version,
        max_progress_resolution: config.max_progress_resolution,
        batch_size: config.batch_size,
        stall_timeout: config.stall_timeout,
    };
    let db = match Database::open_with_options(&config.data_dir, config.base_url.clone(), options).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "failed to open local store");
            return ExitCode::FAILURE;
        }
    };

    let mut changes = db.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = changes.recv().await {
            tracing::debug!(?event, "store state changed");
        }
    });

    if !args.skip_update {
        let set = parse_series_set(&args.series);
        let result = if args.force_update {
            db.force_update(Some(set), &args.lang).await
        } else {
            db.update(Some(set), &args.lang).await
        };
        if let Err(e) = result {
            tracing::error!(error = %e, retriable = e.retriable(), "update failed");
            return ExitCode::FAILURE;
        }
    }

    if !args.kanji.is_empty() {
        let chars: Vec<char> = args.kanji.chars().collect();
        match db.get_kanji(&chars, &args.lang).await {
            Ok(results) => {
                for result in results {
                    println!("{}", render_kanji(&result));
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "getKanji failed");
                return ExitCode::FAILURE;
            }
        }
    }

    if !args.name_query.is_empty() {
        match db.get_names(&args.name_query) {
            Ok(result) => {
                for ranked in result.matches {
                    println!("{:?}: {:?}", ranked.rank, ranked.record.k);
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "getNames failed");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

fn render_kanji(result: &jpdict::KanjiResult) -> String {
    let c = char::from_u32(result.c).unwrap_or('?');
    format!(
        "{c} rad={}{} comp={} meanings={}",
        result.rad.b,
        result
            .rad
            .k
            .as_deref()
            .map(|k| format!("/{k}"))
            .unwrap_or_default(),
        result.comp.len(),
        result.m.join(", ")
    )
}
