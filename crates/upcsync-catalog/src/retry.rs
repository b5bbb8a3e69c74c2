//! Retry-until-success loop for catalog requests.
//!
//! The catalog endpoint is expected to recover eventually, so a failed
//! request is never surfaced to the caller: every transport error and every
//! non-200 status is retried. The only knob is the pause between attempts,
//! which doubles from `base_delay_ms` up to `max_delay_ms`. A zero base
//! retries immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::CatalogError;

/// Delay in milliseconds before retry number `attempt` (1-based).
///
/// | Attempt | Delay with `base = 1_000`, `max = 60_000` |
/// |---------|-------------------------------------------|
/// | 1       | 1 000 ms                                  |
/// | 2       | 2 000 ms                                  |
/// | 3       | 4 000 ms                                  |
/// | 7+      | 60 000 ms                                 |
pub(crate) fn delay_for_attempt(attempt: u32, base_delay_ms: u64, max_delay_ms: u64) -> u64 {
    if base_delay_ms == 0 {
        return 0;
    }
    let exponent = attempt.saturating_sub(1).min(62);
    base_delay_ms
        .saturating_mul(1u64 << exponent)
        .min(max_delay_ms)
}

/// Runs `operation` against `url` until it returns `Ok`.
///
/// There is no attempt limit. A persistently failing endpoint blocks the
/// caller forever; each failure is logged at `warn` with the URL.
pub(crate) async fn retry_until_ok<T, F, Fut>(
    url: &str,
    base_delay_ms: u64,
    max_delay_ms: u64,
    mut operation: F,
) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CatalogError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return value,
            Err(err) => err,
        };

        attempt = attempt.saturating_add(1);
        let delay_ms = delay_for_attempt(attempt, base_delay_ms, max_delay_ms);
        tracing::warn!(
            url,
            attempt,
            delay_ms,
            error = %err,
            "catalog request failed, will retry"
        );
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }
}
