//! Prometheus exposition of per-device statistics.

use std::collections::BTreeMap;

use fleetwatch_store::DeviceStats;

/// Content type for the text exposition format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Format a statistics snapshot as Prometheus exposition format.
///
/// Devices are emitted in identifier order. The average upload is reported
/// in nanoseconds, the same unit devices submit.
pub fn format_prometheus(stats: &BTreeMap<String, DeviceStats>, namespace: Option<&str>) -> String {
    let mut output = String::new();
    let prefix = namespace.map(|n| format!("{}_", n)).unwrap_or_default();

    output.push_str(&format!(
        "# HELP {}fleetwatch_devices Number of devices known to the service\n",
        prefix
    ));
    output.push_str(&format!("# TYPE {}fleetwatch_devices gauge\n", prefix));
    output.push_str(&format!("{}fleetwatch_devices {}\n", prefix, stats.len()));

    output.push_str(&format!(
        "# HELP {}fleetwatch_device_uptime_percent Minutes with a heartbeat over the observed window\n",
        prefix
    ));
    output.push_str(&format!(
        "# TYPE {}fleetwatch_device_uptime_percent gauge\n",
        prefix
    ));
    for (device_id, device) in stats {
        output.push_str(&format!(
            "{}fleetwatch_device_uptime_percent{{device=\"{}\"}} {}\n",
            prefix,
            escape_label_value(device_id),
            device.uptime
        ));
    }

    output.push_str(&format!(
        "# HELP {}fleetwatch_device_upload_average_nanoseconds Mean reported upload duration\n",
        prefix
    ));
    output.push_str(&format!(
        "# TYPE {}fleetwatch_device_upload_average_nanoseconds gauge\n",
        prefix
    ));
    for (device_id, device) in stats {
        output.push_str(&format!(
            "{}fleetwatch_device_upload_average_nanoseconds{{device=\"{}\"}} {}\n",
            prefix,
            escape_label_value(device_id),
            device.average_upload
        ));
    }

    output
}

/// Escape a label value for Prometheus format.
/// Backslash, double-quote, and newline must be escaped.
fn escape_label_value(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
