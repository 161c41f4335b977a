//! Shared retry helper for use cases.
//!
//! Wraps a store call in the [`RetryPolicy`]: transient failures are retried
//! with exponential backoff, everything else is returned immediately.

use crate::config::RetryPolicy;
use crate::ports::session_observer::SessionObserver;
use crate::ports::store_error::StoreError;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Run `call` until it succeeds, fails permanently, or runs out of attempts.
///
/// When `cancellation_token` fires during a backoff, the last error is
/// returned without further attempts.
pub(crate) async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    observer: &dyn SessionObserver,
    cancellation_token: Option<&CancellationToken>,
    mut call: F,
) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        let result = match policy.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, call())
                .await
                .unwrap_or(Err(StoreError::Timeout)),
            None => call().await,
        };

        let error = match result {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < policy.max_attempts => e,
            Err(e) => {
                if e.is_transient() {
                    warn!("{} failed after {} attempts: {}", operation, attempt, e);
                }
                return Err(e);
            }
        };

        if attempt >= policy.surface_after {
            observer.on_retrying(operation, attempt, &error);
        }
        let delay = policy.backoff_for(attempt);
        debug!(
            "{} attempt {} failed ({}), retrying in {:?}",
            operation, attempt, error, delay
        );

        match cancellation_token {
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => {
                        warn!("{} cancelled after {} attempts", operation, attempt);
                        return Err(error);
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            None => tokio::time::sleep(delay).await,
        }
    }
}
