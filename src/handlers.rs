//! Request handlers for the device API.
//!
//! [`Handlers::dispatch`] turns a method, a path and a fully read body into
//! a response. It never touches the network, which keeps every endpoint
//! testable without a listener.

use std::sync::Arc;

use fleetwatch_store::{DeviceStore, StoreError};
use fleetwatch_types::{
    ErrorResponse, HealthResponse, HeartbeatRequest, SentAt, StatsResponse, UploadRequest,
};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Method, Response, StatusCode};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::metrics::{format_prometheus, PROMETHEUS_CONTENT_TYPE};
use crate::router::{match_route, Route, HEARTBEAT_SUFFIX, STATS_SUFFIX};

/// Response type produced by every handler.
pub type HttpResponse = Response<Full<Bytes>>;

const JSON_CONTENT_TYPE: &str = "application/json";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

pub const MSG_INVALID_DEVICE_ID: &str = "invalid device_id in path";
pub const MSG_INVALID_JSON: &str = "invalid JSON payload";
pub const MSG_INVALID_SENT_AT: &str = "invalid sent_at timestamp";
pub const MSG_NEGATIVE_UPLOAD: &str = "upload_time must be non-negative";
pub const MSG_DEVICE_NOT_FOUND: &str = "device not found";
pub const MSG_INTERNAL: &str = "internal server error";
pub const MSG_BODY_TOO_LARGE: &str = "request body too large";

/// Shared request handling state.
pub struct Handlers {
    store: Arc<dyn DeviceStore>,
    metrics_namespace: Option<String>,
}

impl Handlers {
    pub fn new(store: Arc<dyn DeviceStore>) -> Self {
        Self {
            store,
            metrics_namespace: None,
        }
    }

    /// Prefix every exported metric name with `namespace_`.
    pub fn with_metrics_namespace(mut self, namespace: Option<String>) -> Self {
        self.metrics_namespace = namespace;
        self
    }

    /// Route a request and run the matching handler.
    pub fn dispatch(&self, method: &Method, path: &str, body: &[u8]) -> HttpResponse {
        match match_route(method, path) {
            Route::Heartbeat(device_id) => self.heartbeat(device_id, body),
            Route::RecordUpload(device_id) => self.record_upload(device_id, body),
            Route::ReadStats(device_id) => self.read_stats(device_id),
            Route::Health => self.health(),
            Route::Metrics => self.metrics(),
            Route::InvalidDeviceId { endpoint } => {
                warn!(endpoint, path, "missing device_id in path");
                json_error(StatusCode::BAD_REQUEST, MSG_INVALID_DEVICE_ID)
            }
            Route::MethodNotAllowed => {
                text_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
            }
            Route::NotFound => text_response(StatusCode::NOT_FOUND, "404 page not found"),
        }
    }

    fn heartbeat(&self, device_id: &str, body: &[u8]) -> HttpResponse {
        log_raw_body(device_id, HEARTBEAT_SUFFIX, body);

        let request: HeartbeatRequest = match serde_json::from_slice(body) {
            Ok(request) => request,
            Err(e) => {
                warn!(device_id, endpoint = HEARTBEAT_SUFFIX, error = %e, "failed to decode JSON");
                return json_error(StatusCode::BAD_REQUEST, MSG_INVALID_JSON);
            }
        };

        let Some(sent_at) = request.sent_at else {
            warn!(device_id, endpoint = HEARTBEAT_SUFFIX, "missing sent_at");
            return json_error(StatusCode::BAD_REQUEST, MSG_INVALID_SENT_AT);
        };

        match self
            .store
            .record_heartbeat(device_id, sent_at.into_datetime())
        {
            Ok(()) => no_content(),
            Err(e) => store_error(device_id, HEARTBEAT_SUFFIX, e),
        }
    }

    fn record_upload(&self, device_id: &str, body: &[u8]) -> HttpResponse {
        log_raw_body(device_id, STATS_SUFFIX, body);

        let request: UploadRequest = match serde_json::from_slice(body) {
            Ok(request) => request,
            Err(e) => {
                warn!(device_id, endpoint = STATS_SUFFIX, error = %e, "failed to decode JSON");
                return json_error(StatusCode::BAD_REQUEST, MSG_INVALID_JSON);
            }
        };

        if request.upload_time < 0 {
            warn!(
                device_id,
                endpoint = STATS_SUFFIX,
                upload_time = request.upload_time,
                "negative upload_time"
            );
            return json_error(StatusCode::BAD_REQUEST, MSG_NEGATIVE_UPLOAD);
        }

        // The store does not use the upload timestamp, so it stays optional.
        let sent_at = request
            .sent_at
            .map(SentAt::into_datetime)
            .unwrap_or_default();

        match self
            .store
            .record_upload(device_id, sent_at, request.upload_time as f64)
        {
            Ok(()) => no_content(),
            Err(e) => store_error(device_id, STATS_SUFFIX, e),
        }
    }

    fn read_stats(&self, device_id: &str) -> HttpResponse {
        match self.store.read_stats(device_id) {
            Ok(stats) => json_response(
                StatusCode::OK,
                &StatsResponse::new(stats.uptime, stats.average_upload),
            ),
            Err(e) => store_error(device_id, STATS_SUFFIX, e),
        }
    }

    fn health(&self) -> HttpResponse {
        json_response(
            StatusCode::OK,
            &HealthResponse::ok(self.store.device_count()),
        )
    }

    fn metrics(&self) -> HttpResponse {
        let body = format_prometheus(&self.store.snapshot(), self.metrics_namespace.as_deref());
        response(StatusCode::OK, PROMETHEUS_CONTENT_TYPE, Bytes::from(body))
    }
}

fn log_raw_body(device_id: &str, endpoint: &str, body: &[u8]) {
    debug!(
        device_id,
        endpoint,
        body = %String::from_utf8_lossy(body),
        "raw request body"
    );
}

fn store_error(device_id: &str, endpoint: &str, err: StoreError) -> HttpResponse {
    match err {
        StoreError::DeviceNotFound(_) => {
            warn!(device_id, endpoint, "device not found");
            json_error(StatusCode::NOT_FOUND, MSG_DEVICE_NOT_FOUND)
        }
        other => {
            error!(device_id, endpoint, error = %other, "store operation failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL)
        }
    }
}

/// `{"msg": ...}` body with the given status.
pub fn json_error(status: StatusCode, msg: &str) -> HttpResponse {
    json_response(status, &ErrorResponse::new(msg))
}

fn json_response<T: Serialize>(status: StatusCode, value: &T) -> HttpResponse {
    match serde_json::to_vec(value) {
        Ok(body) => response(status, JSON_CONTENT_TYPE, Bytes::from(body)),
        Err(e) => {
            error!(error = %e, "failed to encode response");
            text_response(StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL)
        }
    }
}

fn text_response(status: StatusCode, body: &'static str) -> HttpResponse {
    response(status, TEXT_CONTENT_TYPE, Bytes::from_static(body.as_bytes()))
}

fn no_content() -> HttpResponse {
    let mut resp = Response::new(Full::new(Bytes::new()));
    *resp.status_mut() = StatusCode::NO_CONTENT;
    resp
}

fn response(status: StatusCode, content_type: &'static str, body: Bytes) -> HttpResponse {
    let mut resp = Response::new(Full::new(body));
    *resp.status_mut() = status;
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    resp
}
