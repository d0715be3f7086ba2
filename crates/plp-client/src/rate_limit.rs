//! Retry with exponential back-off and jitter for catalog requests.
//!
//! Transient failures (429, timeouts, connection errors, 5xx) are retried.
//! Everything else is returned to the caller on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` if `err` is worth retrying after a back-off delay.
///
/// Retriable:
/// - [`ClientError::RateLimited`]: HTTP 429.
/// - [`ClientError::Http`]: timeout or connect failure.
/// - [`ClientError::UnexpectedStatus`] with a 5xx status.
///
/// Not retriable: [`ClientError::NotFound`], 4xx statuses,
/// [`ClientError::Deserialize`], [`ClientError::InvalidBaseUrl`].
pub(crate) fn is_retriable(err: &ClientError) -> bool {
    match err {
        ClientError::RateLimited { .. } => true,
        ClientError::Http(e) => e.is_timeout() || e.is_connect(),
        ClientError::UnexpectedStatus { status, .. } => (500..600).contains(status),
        ClientError::NotFound { .. }
        | ClientError::Deserialize { .. }
        | ClientError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on
/// transient errors.
///
/// Back-off schedule with `backoff_base_ms = 500`:
///
/// | Attempt | Sleep before next attempt  |
/// |---------|----------------------------|
/// | 1       | 500 ms × 2⁰ ± 25 % jitter  |
/// | 2       | 500 ms × 2¹ ± 25 % jitter  |
/// | 3       | 500 ms × 2² ± 25 % jitter  |
///
/// Delay is capped at 60 s. With `max_retries = 3` the operation runs at
/// most 4 times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient catalog error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
