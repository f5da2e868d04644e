//! Time utilities for the simulation loop

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Get current Unix timestamp in milliseconds
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}

/// Seconds elapsed between two millisecond timestamps.
///
/// Clock skew can produce `now < last`; the result is clamped to zero so the
/// ball never moves backward along its direction vector.
pub fn elapsed_secs(now_ms: u64, last_ms: u64) -> f64 {
    now_ms.saturating_sub(last_ms) as f64 / 1000.0
}
