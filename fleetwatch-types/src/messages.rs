//! Request and response bodies for the HTTP API.

use crate::{format_duration, SentAt};

/// Body of `POST /api/v1/devices/{id}/heartbeat`.
///
/// `sent_at` is optional at the decoding layer so a missing value can be
/// reported distinctly from a malformed one.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeartbeatRequest {
    #[cfg_attr(feature = "serde", serde(default))]
    pub sent_at: Option<SentAt>,
}

/// Body of `POST /api/v1/devices/{id}/stats`.
///
/// Both fields may be omitted; a missing `upload_time` counts as zero.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UploadRequest {
    #[cfg_attr(feature = "serde", serde(default))]
    pub sent_at: Option<SentAt>,

    /// Upload duration in nanoseconds, as measured by the device.
    #[cfg_attr(feature = "serde", serde(default))]
    pub upload_time: i64,
}

/// Body of `GET /api/v1/devices/{id}/stats`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsResponse {
    /// Uptime percentage over the observed heartbeat window.
    pub uptime: f64,

    /// Average upload duration, formatted like `1.5ms`.
    pub avg_upload_time: String,
}

impl StatsResponse {
    /// Build a response from raw statistics, treating the average as nanoseconds.
    pub fn new(uptime: f64, avg_upload_nanos: f64) -> Self {
        Self {
            uptime,
            avg_upload_time: format_duration(avg_upload_nanos),
        }
    }
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorResponse {
    pub msg: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// Body of `GET /healthz`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealthResponse {
    pub status: String,

    /// Number of devices the service was started with.
    pub devices: usize,
}

impl HealthResponse {
    pub fn ok(devices: usize) -> Self {
        Self {
            status: "ok".into(),
            devices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_response_formats_average() {
        let resp = StatsResponse::new(75.0, 2500.0);
        assert_eq!(resp.uptime, 75.0);
        assert_eq!(resp.avg_upload_time, "2.5µs");

        let empty = StatsResponse::new(0.0, 0.0);
        assert_eq!(empty.avg_upload_time, "0s");
    }

    #[test]
    fn health_response_ok() {
        let resp = HealthResponse::ok(3);
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.devices, 3);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn heartbeat_request_missing_or_null_sent_at_is_none() {
        let missing: HeartbeatRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.sent_at, None);

        let null: HeartbeatRequest = serde_json::from_str(r#"{"sent_at":null}"#).unwrap();
        assert_eq!(null.sent_at, None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn upload_request_accepts_epoch_and_text() {
        let text: UploadRequest =
            serde_json::from_str(r#"{"sent_at":"2024-01-01T12:00:00Z","upload_time":1500}"#)
                .unwrap();
        let epoch: UploadRequest =
            serde_json::from_str(r#"{"sent_at":1704110400,"upload_time":1500}"#).unwrap();

        assert_eq!(text, epoch);
        assert_eq!(text.upload_time, 1500);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn upload_request_defaults_missing_fields() {
        let empty: UploadRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.sent_at, None);
        assert_eq!(empty.upload_time, 0);

        let no_time: UploadRequest = serde_json::from_str(r#"{"sent_at":0}"#).unwrap();
        assert_eq!(no_time.upload_time, 0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn upload_request_requires_integer_upload_time() {
        assert!(
            serde_json::from_str::<UploadRequest>(r#"{"sent_at":0,"upload_time":1.5}"#).is_err()
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn stats_response_json_shape() {
        let json = serde_json::to_string(&StatsResponse::new(150.0, 1_500_000.0)).unwrap();
        assert_eq!(json, r#"{"uptime":150.0,"avg_upload_time":"1.5ms"}"#);
    }
}
