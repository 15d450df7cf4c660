//! Per-device aggregate state.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::stats::{compute_average_upload, compute_uptime, DeviceStats};

const SECONDS_PER_MINUTE: i64 = 60;

/// Minute bucket of an instant: epoch seconds floor-divided by 60.
pub fn minute_bucket(at: &DateTime<Utc>) -> i64 {
    at.timestamp().div_euclid(SECONDS_PER_MINUTE)
}

/// Inclusive bounds of every minute bucket a device has ever reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinuteWindow {
    pub first: i64,
    pub last: i64,
}

impl MinuteWindow {
    fn at(minute: i64) -> Self {
        Self {
            first: minute,
            last: minute,
        }
    }

    fn extend(&mut self, minute: i64) {
        self.first = self.first.min(minute);
        self.last = self.last.max(minute);
    }
}

#[derive(Debug, Default)]
struct AggregateState {
    minutes: HashSet<i64>,
    /// `None` until the first heartbeat.
    window: Option<MinuteWindow>,
    upload_sum: f64,
    upload_count: u64,
}

/// Heartbeat minutes and upload totals for one device.
///
/// Every field sits behind one lock: writers take it exclusively and
/// [`read_stats`](Self::read_stats) takes it shared, so both statistics
/// always come from the same generation of state.
#[derive(Debug, Default)]
pub struct DeviceAggregate {
    state: RwLock<AggregateState>,
}

impl DeviceAggregate {
    /// Create an aggregate with no heartbeats or uploads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a heartbeat. Heartbeats landing in an already seen minute
    /// leave the state unchanged.
    pub fn record_heartbeat(&self, sent_at: DateTime<Utc>) {
        let minute = minute_bucket(&sent_at);

        let mut state = self.state.write();
        state.window = Some(match state.window {
            Some(mut window) => {
                window.extend(minute);
                window
            }
            None => MinuteWindow::at(minute),
        });
        state.minutes.insert(minute);
    }

    /// Add one upload sample. The value is not validated.
    pub fn record_upload(&self, value: f64) {
        let mut state = self.state.write();
        state.upload_count += 1;
        state.upload_sum += value;
    }

    /// Compute uptime and average upload from one consistent view.
    pub fn read_stats(&self) -> DeviceStats {
        let state = self.state.read();
        let (first, last) = state
            .window
            .map(|w| (w.first, w.last))
            .unwrap_or_default();

        DeviceStats {
            uptime: compute_uptime(&state.minutes, first, last),
            average_upload: compute_average_upload(state.upload_sum, state.upload_count),
        }
    }

    /// Observed heartbeat window, if any heartbeat was recorded.
    pub fn window(&self) -> Option<MinuteWindow> {
        self.state.read().window
    }

    /// Number of distinct minute buckets with a heartbeat.
    pub fn distinct_minutes(&self) -> usize {
        self.state.read().minutes.len()
    }

    /// Number of upload samples recorded.
    pub fn upload_count(&self) -> u64 {
        self.state.read().upload_count
    }
}
