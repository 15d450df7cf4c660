//! Derived statistics computed from aggregate counters.

use std::collections::HashSet;

/// Uptime and average upload of one device, read as a single snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeviceStats {
    /// Percentage of minutes with a heartbeat across the observed window.
    pub uptime: f64,
    /// Mean upload sample, in whatever unit the device reports.
    pub average_upload: f64,
}

/// Uptime percentage of a heartbeat window.
///
/// - No heartbeats: `0.0`, whatever the window bounds say.
/// - A single distinct minute: `100.0`.
/// - Otherwise: distinct minutes divided by the span `last - first`, times
///   100. The span has no `+1`, so a fully dense window reports more than
///   100; the value is never clamped.
///
/// ```rust
/// use std::collections::HashSet;
/// use fleetwatch_store::stats::compute_uptime;
///
/// let minutes: HashSet<i64> = [0, 2, 4].into_iter().collect();
/// assert_eq!(compute_uptime(&minutes, 0, 4), 75.0);
/// ```
pub fn compute_uptime(minutes: &HashSet<i64>, first_minute: i64, last_minute: i64) -> f64 {
    if minutes.is_empty() {
        return 0.0;
    }
    if first_minute == last_minute {
        return 100.0;
    }

    let observed = minutes.len() as f64;
    let span = (last_minute - first_minute) as f64;
    (observed / span) * 100.0
}

/// Mean of the recorded upload samples, `0.0` when there are none.
pub fn compute_average_upload(sum: f64, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}
