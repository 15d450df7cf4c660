//! Registry of device aggregates.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::aggregate::DeviceAggregate;
use crate::error::{StoreError, StoreResult};
use crate::stats::DeviceStats;

/// Operations the request layer needs from a device store.
///
/// Handlers depend on this trait rather than on [`AggregationStore`] so they
/// can be exercised against a substitute store in tests.
pub trait DeviceStore: Send + Sync {
    /// Record a heartbeat for a known device.
    fn record_heartbeat(&self, device_id: &str, sent_at: DateTime<Utc>) -> StoreResult<()>;

    /// Record an upload duration sample for a known device.
    fn record_upload(
        &self,
        device_id: &str,
        sent_at: DateTime<Utc>,
        upload: f64,
    ) -> StoreResult<()>;

    /// Read uptime and average upload for a known device.
    fn read_stats(&self, device_id: &str) -> StoreResult<DeviceStats>;

    /// Number of devices the store was created with.
    fn device_count(&self) -> usize;

    /// Statistics for every device, keyed by identifier.
    fn snapshot(&self) -> BTreeMap<String, DeviceStats>;
}

/// Thread-safe store of every known device.
///
/// The set of devices is fixed at construction. Lookups take the registry
/// lock in shared mode, clone the aggregate handle and release the registry
/// before touching the aggregate's own lock, so writers to different devices
/// never wait on each other.
///
/// # Example
///
/// ```rust
/// use chrono::DateTime;
/// use fleetwatch_store::{AggregationStore, StoreError};
///
/// let store = AggregationStore::new(["sensor-a", "sensor-b"]);
/// let sent_at = DateTime::from_timestamp(1_704_110_400, 0).unwrap();
///
/// store.record_heartbeat("sensor-a", sent_at).unwrap();
/// store.record_upload("sensor-a", sent_at, 2_500.0).unwrap();
///
/// let stats = store.read_stats("sensor-a").unwrap();
/// assert_eq!(stats.uptime, 100.0);
/// assert_eq!(stats.average_upload, 2_500.0);
///
/// assert!(matches!(
///     store.read_stats("sensor-z"),
///     Err(StoreError::DeviceNotFound(_))
/// ));
/// ```
#[derive(Debug, Default)]
pub struct AggregationStore {
    devices: RwLock<HashMap<String, Arc<DeviceAggregate>>>,
}

impl AggregationStore {
    /// Create a store with one empty aggregate per identifier.
    ///
    /// Duplicate identifiers collapse into a single device.
    pub fn new<I, S>(device_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let devices = device_ids
            .into_iter()
            .map(|id| (id.into(), Arc::new(DeviceAggregate::new())))
            .collect();

        Self {
            devices: RwLock::new(devices),
        }
    }

    /// Find a device's aggregate. The registry guard is dropped before return.
    fn lookup(&self, device_id: &str) -> StoreResult<Arc<DeviceAggregate>> {
        self.devices
            .read()
            .get(device_id)
            .cloned()
            .ok_or_else(|| StoreError::DeviceNotFound(device_id.to_string()))
    }

    /// Record a heartbeat for `device_id` at `sent_at`.
    pub fn record_heartbeat(&self, device_id: &str, sent_at: DateTime<Utc>) -> StoreResult<()> {
        self.lookup(device_id)?.record_heartbeat(sent_at);
        Ok(())
    }

    /// Record an upload sample for `device_id`.
    ///
    /// Averages are not windowed, so `sent_at` only identifies the report.
    /// Any value is accepted, including negative ones.
    pub fn record_upload(
        &self,
        device_id: &str,
        _sent_at: DateTime<Utc>,
        upload: f64,
    ) -> StoreResult<()> {
        self.lookup(device_id)?.record_upload(upload);
        Ok(())
    }

    /// Read the current statistics for `device_id`.
    pub fn read_stats(&self, device_id: &str) -> StoreResult<DeviceStats> {
        Ok(self.lookup(device_id)?.read_stats())
    }

    /// Whether `device_id` is a known device.
    pub fn contains(&self, device_id: &str) -> bool {
        self.devices.read().contains_key(device_id)
    }

    /// Number of known devices.
    pub fn device_count(&self) -> usize {
        self.devices.read().len()
    }

    /// Read every device's statistics.
    ///
    /// Aggregates are read one at a time after the registry guard is
    /// released, so the result is consistent per device, not across devices.
    pub fn snapshot(&self) -> BTreeMap<String, DeviceStats> {
        let devices: Vec<(String, Arc<DeviceAggregate>)> = self
            .devices
            .read()
            .iter()
            .map(|(id, aggregate)| (id.clone(), aggregate.clone()))
            .collect();

        devices
            .into_iter()
            .map(|(id, aggregate)| (id, aggregate.read_stats()))
            .collect()
    }

    #[cfg(test)]
    fn aggregate(&self, device_id: &str) -> Arc<DeviceAggregate> {
        self.lookup(device_id).unwrap()
    }
}

impl DeviceStore for AggregationStore {
    fn record_heartbeat(&self, device_id: &str, sent_at: DateTime<Utc>) -> StoreResult<()> {
        AggregationStore::record_heartbeat(self, device_id, sent_at)
    }

    fn record_upload(
        &self,
        device_id: &str,
        sent_at: DateTime<Utc>,
        upload: f64,
    ) -> StoreResult<()> {
        AggregationStore::record_upload(self, device_id, sent_at, upload)
    }

    fn read_stats(&self, device_id: &str) -> StoreResult<DeviceStats> {
        AggregationStore::read_stats(self, device_id)
    }

    fn device_count(&self) -> usize {
        AggregationStore::device_count(self)
    }

    fn snapshot(&self) -> BTreeMap<String, DeviceStats> {
        AggregationStore::snapshot(self)
    }
}
