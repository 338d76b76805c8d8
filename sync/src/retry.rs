use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::backoff::Backoff;
use crate::error::SyncError;

/// How often `with_retry` re-polls [`Reachability::is_online`] while
/// waiting for connectivity to come back.
const OFFLINE_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Native stand-in for a browser's `online`/`offline` events (spec.md §4.6).
/// No network-reachability API is uniform across native targets, so the
/// default implementation always reports online; a consumer with access to
/// a real signal (e.g. a platform connectivity check) can supply its own.
/// Polled rather than awaited (no `wait_for_online` future) so the trait
/// stays free of async-fn-in-trait machinery.
pub trait Reachability: Send + Sync {
    fn is_online(&self) -> bool {
        true
    }
}

/// Always-online [`Reachability`] (spec.md §5 Open Question: no native
/// connectivity API is portable enough to bake in by default — see
/// `DESIGN.md`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysOnline;

impl Reachability for AlwaysOnline {}

/// How many times a storage constraint-violation gets its own narrower
/// retry before giving up (spec.md §4.6 "retried via an idle-time scheduler
/// up to 2 times").
const CONSTRAINT_RETRY_LIMIT: u32 = 2;

/// Runs `op` under the retry policy in spec.md §4.6: offline waits for
/// [`Reachability::wait_for_online`], network-class errors back off per
/// [`Backoff`], a storage constraint-violation gets up to
/// [`CONSTRAINT_RETRY_LIMIT`] narrow retries, and anything else is
/// terminal. `on_retry(retry_count, next_delay)` is called before each
/// backoff sleep so a caller can surface it to the reducer/UI.
pub async fn with_retry<R, F, Fut>(
    reachability: &R,
    cancel: &CancellationToken,
    mut on_retry: impl FnMut(u32, Duration),
    mut op: F,
) -> Result<(), SyncError>
where
    R: Reachability,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), SyncError>>,
{
    let mut backoff = Backoff::new();
    let mut constraint_retries = 0u32;

    loop {
        while !reachability.is_online() {
            warn!("offline, waiting for connectivity before retrying");
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(SyncError::Abort),
                () = tokio::time::sleep(OFFLINE_POLL_INTERVAL) => {}
            }
        }

        match op().await {
            Ok(()) => {
                backoff.reset();
                return Ok(());
            }
            Err(SyncError::Abort) => return Err(SyncError::Abort),
            Err(e) if e.is_constraint_violation() => {
                if constraint_retries >= CONSTRAINT_RETRY_LIMIT {
                    return Err(e);
                }
                constraint_retries += 1;
                continue;
            }
            Err(e) if e.retriable() => {
                let delay = backoff.next_delay();
                on_retry(backoff.retry_count(), delay);
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return Err(SyncError::Abort),
                    () = tokio::time::sleep(delay) => {}
                }
            }
            Err(e) => return Err(e),
        }
    }
}
