//! Duration formatting for API responses.
//!
//! Upload durations arrive as integer nanoseconds and the API reports their
//! average as text in the same shape Go's `time.Duration::String` produces,
//! so existing dashboards can parse it unchanged.

const NANOS_PER_MICRO: u64 = 1_000;
const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Format a nanosecond magnitude as a duration string.
///
/// The value is truncated toward zero to whole nanoseconds first. Values
/// outside the `i64` range saturate and `NaN` formats as `"0s"`.
///
/// ```rust
/// use fleetwatch_types::format_duration;
///
/// assert_eq!(format_duration(0.0), "0s");
/// assert_eq!(format_duration(83.33), "83ns");
/// assert_eq!(format_duration(1_500_000.0), "1.5ms");
/// assert_eq!(format_duration(90e9), "1m30s");
/// ```
pub fn format_duration(nanos: f64) -> String {
    format_nanos(nanos as i64)
}

/// Format whole nanoseconds as a duration string.
pub fn format_nanos(nanos: i64) -> String {
    if nanos == 0 {
        return "0s".to_string();
    }

    let sign = if nanos < 0 { "-" } else { "" };
    let u = nanos.unsigned_abs();

    let body = if u < NANOS_PER_MICRO {
        format!("{}ns", u)
    } else if u < NANOS_PER_MILLI {
        let (frac, whole) = split_fraction(u, 3);
        format!("{}{}µs", whole, frac)
    } else if u < NANOS_PER_SEC {
        let (frac, whole) = split_fraction(u, 6);
        format!("{}{}ms", whole, frac)
    } else {
        let (frac, whole_secs) = split_fraction(u, 9);
        let mut out = format!("{}{}s", whole_secs % 60, frac);
        let minutes = whole_secs / 60;
        if minutes > 0 {
            out = format!("{}m{}", minutes % 60, out);
            let hours = minutes / 60;
            if hours > 0 {
                out = format!("{}h{}", hours, out);
            }
        }
        out
    };

    format!("{}{}", sign, body)
}

/// Split `value` into a fractional suffix of `precision` digits (trailing
/// zeros dropped, empty when the fraction is zero) and the integer part.
fn split_fraction(value: u64, precision: u32) -> (String, u64) {
    let scale = 10u64.pow(precision);
    let fraction = value % scale;
    let whole = value / scale;

    if fraction == 0 {
        return (String::new(), whole);
    }

    let digits = format!("{:0width$}", fraction, width = precision as usize);
    (format!(".{}", digits.trim_end_matches('0')), whole)
}
