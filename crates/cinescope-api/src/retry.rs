//! Retry executor with exponential backoff.

use std::future::Future;
use std::time::Duration;

use crate::error::{ApiError, Result};

/// Base delay; attempt `n` (0-based) waits `unit * 2^n`.
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_secs(1);

/// Retry budget and backoff for a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct RetryPolicy {
    /// Additional attempts after the first one.
    pub max_retries: u32,
    /// Backoff base unit.
    pub backoff_unit: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the default 1s backoff unit.
    #[must_use]
    pub const fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff_unit: DEFAULT_BACKOFF_UNIT,
        }
    }

    /// Overrides the backoff unit.
    #[must_use]
    pub const fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    /// Delay before the retry that follows `attempt` (0-based).
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_unit
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Runs `op` until it succeeds, fails with a non-retryable error, or the
/// budget is spent.
///
/// Timeouts and 5xx responses are retried after `2^attempt` backoff units.
/// Everything else, 4xx included, is returned immediately.
///
/// # Errors
///
/// Returns the error of the last attempt, or [`ApiError::MaxRetriesExceeded`]
/// if the loop ends without a terminal outcome.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, path: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    for attempt in 0..=policy.max_retries {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_retryable() || attempt == policy.max_retries => {
                return Err(err);
            }
            Err(err) => {
                let backoff = policy.backoff(attempt);
                tracing::warn!(
                    path,
                    attempt = attempt.saturating_add(1),
                    max_retries = policy.max_retries,
                    backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "API request failed, retrying after backoff"
                );
                #[cfg(feature = "otel")]
                record_retry(path);
                tokio::time::sleep(backoff).await;
            }
        }
    }

    Err(ApiError::MaxRetriesExceeded)
}

/// Counts a retry in the `cinescope.api.retries` metric.
#[cfg(feature = "otel")]
fn record_retry(path: &str) {
    let meter = opentelemetry::global::meter("cinescope-api");
    let counter = meter.u64_counter("cinescope.api.retries").build();
    counter.add(1, &[opentelemetry::KeyValue::new("path", String::from(path))]);
}
