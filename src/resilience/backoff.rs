//! Exponential backoff.

use std::time::Duration;

/// Delay to wait after failed attempt number `attempt` (1-based).
///
/// The first retry waits `base_ms`; each later one multiplies the previous delay
/// by `multiplier`, never exceeding `max_ms`.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64, multiplier: f64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
    let delay_ms = (base_ms as f64) * multiplier.max(1.0).powi(exponent);
    let capped_delay = if delay_ms.is_finite() {
        (delay_ms as u64).min(max_ms)
    } else {
        max_ms
    };

    Duration::from_millis(capped_delay)
}
