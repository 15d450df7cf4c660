//! # fleetwatch-store
//!
//! Concurrent in-memory aggregation of device telemetry.
//!
//! Devices report heartbeats and upload durations; this crate keeps one
//! aggregate per device and derives two statistics from it:
//!
//! - **Uptime**: distinct minutes with a heartbeat over the span between the
//!   first and last observed minute, as a percentage
//! - **Average upload**: running sum over running count
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::DateTime;
//! use fleetwatch_store::AggregationStore;
//!
//! let store = AggregationStore::new(["device-1", "device-2"]);
//!
//! for secs in [0, 120, 240] {
//!     let sent_at = DateTime::from_timestamp(secs, 0).unwrap();
//!     store.record_heartbeat("device-1", sent_at).unwrap();
//! }
//!
//! let stats = store.read_stats("device-1").unwrap();
//! assert_eq!(stats.uptime, 75.0);
//! ```
//!
//! ## Concurrency
//!
//! - **Registry lock**: shared for every lookup, never held while a device
//!   is being read or written
//! - **Per-device lock**: exclusive for writes, shared for reads; at most one
//!   device lock is held at a time
//!
//! The device set is fixed when the store is created.

pub mod aggregate;
mod error;
pub mod stats;
mod store;

pub use aggregate::{minute_bucket, DeviceAggregate, MinuteWindow};
pub use error::{StoreError, StoreResult};
pub use stats::DeviceStats;
pub use store::{AggregationStore, DeviceStore};
