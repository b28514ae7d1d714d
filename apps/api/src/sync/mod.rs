//! Best-effort remote write with a local fallback.

use std::future::Future;

use serde::Serialize;
use tracing::{info, warn};

use crate::remote::RemoteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    /// The remote store accepted the write.
    Remote,
    /// No remote was configured, or it failed; the fallback ran instead.
    LocalFallback,
}

/// Runs `remote` if present; on absence or failure runs `fallback`.
///
/// Remote failures are logged and never returned. `what` names the record in logs.
pub async fn write_through<R, L>(what: &str, remote: Option<R>, fallback: L) -> SyncOutcome
where
    R: Future<Output = Result<(), RemoteError>>,
    L: Future<Output = ()>,
{
    match remote {
        Some(op) => match op.await {
            Ok(()) => {
                info!(record = what, "Remote write succeeded");
                return SyncOutcome::Remote;
            }
            Err(e) => {
                warn!(record = what, error = %e, "Remote write failed, falling back to local store");
            }
        },
        None => {
            info!(record = what, "Remote sync disabled, writing locally");
        }
    }

    fallback.await;
    SyncOutcome::LocalFallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_remote_success_skips_fallback() {
        let fallback_runs = AtomicUsize::new(0);
        let outcome = write_through(
            "feedback",
            Some(async { Ok(()) }),
            async {
                fallback_runs.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await;
        assert_eq!(outcome, SyncOutcome::Remote);
        assert_eq!(fallback_runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_failure_runs_fallback() {
        let fallback_runs = AtomicUsize::new(0);
        let outcome = write_through(
            "feedback",
            Some(async { Err(RemoteError::Unavailable("connection refused".to_string())) }),
            async {
                fallback_runs.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await;
        assert_eq!(outcome, SyncOutcome::LocalFallback);
        assert_eq!(fallback_runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_remote_runs_fallback() {
        let fallback_runs = AtomicUsize::new(0);
        let remote: Option<std::future::Ready<Result<(), RemoteError>>> = None;
        let outcome = write_through("user profile", remote, async {
            fallback_runs.fetch_add(1, Ordering::SeqCst);
        })
        .await;
        assert_eq!(outcome, SyncOutcome::LocalFallback);
        assert_eq!(fallback_runs.load(Ordering::SeqCst), 1);
    }
}
