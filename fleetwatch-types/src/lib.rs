//! # fleetwatch-types
//!
//! Wire types for the fleetwatch device telemetry API. This crate defines the
//! request and response bodies exchanged with devices and dashboards, plus
//! the two boundary conversions the service relies on:
//!
//! - **Timestamps**: devices send `sent_at` either as a Unix epoch number or
//!   as an RFC 3339 string. [`SentAt`] resolves both into one canonical UTC
//!   instant before anything reaches the aggregation store.
//! - **Durations**: average upload times are reported in the same textual
//!   form Go's `time.Duration` prints (`2.5µs`, `1m30s`), see
//!   [`format_duration`].
//!
//! ## Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` for the wire types
//!
//! ## Example
//!
//! ```rust
//! use fleetwatch_types::{format_duration, SentAt};
//!
//! let sent_at: SentAt = "2024-01-01T12:00:00Z".parse().unwrap();
//! assert_eq!(sent_at.epoch_seconds(), 1_704_110_400);
//!
//! assert_eq!(format_duration(2500.0), "2.5µs");
//! ```

mod duration;
mod messages;
mod timestamp;

pub use duration::*;
pub use messages::*;
pub use timestamp::*;
