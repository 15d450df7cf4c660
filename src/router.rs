//! Method and path matching for the HTTP API.
//!
//! ```text
//! POST /api/v1/devices/{id}/heartbeat  record a heartbeat
//! POST /api/v1/devices/{id}/stats      record an upload duration
//! GET  /api/v1/devices/{id}/stats      read uptime and average upload
//! ANY  /healthz                        liveness and device count
//! GET  /metrics                        Prometheus exposition
//! ```

use hyper::Method;

/// Prefix shared by every device endpoint.
pub const DEVICES_PREFIX: &str = "/api/v1/devices/";

pub const HEARTBEAT_SUFFIX: &str = "/heartbeat";
pub const STATS_SUFFIX: &str = "/stats";

/// Where a request should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Heartbeat(&'a str),
    RecordUpload(&'a str),
    ReadStats(&'a str),
    Health,
    Metrics,
    /// A device endpoint with an empty identifier segment.
    InvalidDeviceId { endpoint: &'static str },
    MethodNotAllowed,
    NotFound,
}

/// Resolve a request method and path to a [`Route`].
///
/// Method checks run before identifier checks, so `GET .../heartbeat` is
/// rejected as a bad method even when the identifier is empty.
///
/// Suffixes are matched against the whole path, so a bare
/// `/api/v1/devices/heartbeat` is a heartbeat for the device `heartbeat`.
pub fn match_route<'a>(method: &Method, path: &'a str) -> Route<'a> {
    match path {
        "/healthz" => return Route::Health,
        "/metrics" if *method == Method::GET => return Route::Metrics,
        "/metrics" => return Route::MethodNotAllowed,
        _ => {}
    }

    let Some(rest) = path.strip_prefix(DEVICES_PREFIX) else {
        return Route::NotFound;
    };
    if rest.is_empty() {
        return Route::NotFound;
    }

    if path.ends_with(HEARTBEAT_SUFFIX) {
        let device_id = rest.strip_suffix(HEARTBEAT_SUFFIX).unwrap_or(rest);
        return match *method {
            Method::POST => with_device(device_id, HEARTBEAT_SUFFIX, Route::Heartbeat),
            _ => Route::MethodNotAllowed,
        };
    }

    if path.ends_with(STATS_SUFFIX) {
        let device_id = rest.strip_suffix(STATS_SUFFIX).unwrap_or(rest);
        return match *method {
            Method::POST => with_device(device_id, STATS_SUFFIX, Route::RecordUpload),
            Method::GET => with_device(device_id, STATS_SUFFIX, Route::ReadStats),
            _ => Route::MethodNotAllowed,
        };
    }

    Route::NotFound
}

fn with_device<'a>(
    device_id: &'a str,
    endpoint: &'static str,
    route: fn(&'a str) -> Route<'a>,
) -> Route<'a> {
    if device_id.is_empty() {
        Route::InvalidDeviceId { endpoint }
    } else {
        route(device_id)
    }
}
