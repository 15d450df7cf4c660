//! # fleetwatch
//!
//! An HTTP service that collects heartbeats and upload durations from a
//! fixed fleet of devices and reports per-device uptime and average upload
//! time.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          fleetwatch                          │
//! │  ┌────────┐   ┌────────┐   ┌──────────┐   ┌───────────────┐ │
//! │  │ server │──▶│ router │──▶│ handlers │──▶│ DeviceStore   │ │
//! │  │ (hyper)│   │        │   │  (JSON)  │   │ (aggregation) │ │
//! │  └────────┘   └────────┘   └────┬─────┘   └───────────────┘ │
//! │                                 │                            │
//! │                                 ▼                            │
//! │                            ┌─────────┐                       │
//! │                            │ metrics │ Prometheus text       │
//! │                            └─────────┘                       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`config`]**: layered settings (defaults, file, environment, flags)
//! - **[`devices`]**: device list loading from CSV
//! - **[`router`]**: method and path matching
//! - **[`handlers`]**: request decoding, validation and error mapping
//! - **[`server`]**: HTTP/1 accept loop with request logging
//! - **[`metrics`]**: Prometheus exposition of every device
//!
//! The aggregation itself lives in `fleetwatch-store`; wire types live in
//! `fleetwatch-types`.
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Serve devices.csv on the default port
//! fleetwatch
//!
//! # Custom port and device list
//! PORT=8080 DEVICES_CSV=/etc/fleet/devices.csv fleetwatch
//! fleetwatch --port 8080 --devices /etc/fleet/devices.csv
//! ```
//!
//! ### As a library
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fleetwatch::{Handlers, Server};
//! use fleetwatch_store::AggregationStore;
//!
//! # tokio_test::block_on(async {
//! let store = Arc::new(AggregationStore::new(["sensor-1", "sensor-2"]));
//! let handlers = Arc::new(Handlers::new(store));
//!
//! let server = Server::bind("127.0.0.1:6733".parse().unwrap()).await.unwrap();
//! server.serve(handlers, fleetwatch::shutdown_signal()).await.unwrap();
//! # });
//! ```
//!
//! Handlers can also be driven without a listener:
//!
//! ```rust
//! use std::sync::Arc;
//! use fleetwatch::Handlers;
//! use fleetwatch_store::AggregationStore;
//! use hyper::{Method, StatusCode};
//!
//! let handlers = Handlers::new(Arc::new(AggregationStore::new(["sensor-1"])));
//! let resp = handlers.dispatch(
//!     &Method::POST,
//!     "/api/v1/devices/sensor-1/heartbeat",
//!     br#"{"sent_at":"2024-01-01T12:00:00Z"}"#,
//! );
//! assert_eq!(resp.status(), StatusCode::NO_CONTENT);
//! ```

pub mod app;
pub mod config;
pub mod devices;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod router;
pub mod server;

pub use app::{run, shutdown_signal};
pub use config::{Settings, SettingsOverrides};
pub use handlers::Handlers;
pub use server::Server;
