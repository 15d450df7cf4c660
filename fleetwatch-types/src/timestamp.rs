//! Device-supplied timestamps.
//!
//! Devices report `sent_at` either as a Unix epoch number or as an RFC 3339
//! string. Both forms are resolved here into a single UTC instant so the
//! rest of the system only ever handles one representation.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Errors produced while resolving a device timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    /// The timestamp string was empty or whitespace.
    #[error("timestamp is empty")]
    Empty,

    /// The epoch value cannot be represented as a calendar instant.
    #[error("epoch seconds out of range: {0}")]
    OutOfRange(String),

    /// The string is neither RFC 3339 nor an integer epoch.
    #[error("invalid timestamp {value:?}: {reason}")]
    Invalid { value: String, reason: String },
}

/// The instant a device says it sent a message, in UTC.
///
/// # Example
///
/// ```rust
/// use fleetwatch_types::SentAt;
///
/// let from_text: SentAt = "2024-01-01T12:00:00+02:00".parse().unwrap();
/// let from_epoch = SentAt::from_epoch_seconds(1_704_103_200).unwrap();
/// assert_eq!(from_text, from_epoch);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SentAt(DateTime<Utc>);

impl SentAt {
    /// Wrap an existing UTC instant.
    pub const fn from_datetime(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// Build from whole seconds since the Unix epoch.
    pub fn from_epoch_seconds(secs: i64) -> Result<Self, TimestampError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| TimestampError::OutOfRange(secs.to_string()))
    }

    /// Build from fractional seconds since the Unix epoch.
    pub fn from_epoch_seconds_f64(secs: f64) -> Result<Self, TimestampError> {
        if !secs.is_finite() || secs < i64::MIN as f64 || secs >= i64::MAX as f64 {
            return Err(TimestampError::OutOfRange(secs.to_string()));
        }

        let whole = secs.floor();
        let mut whole_secs = whole as i64;
        let mut nanos = ((secs - whole) * NANOS_PER_SEC).round() as u32;
        if nanos >= 1_000_000_000 {
            whole_secs += 1;
            nanos -= 1_000_000_000;
        }

        DateTime::from_timestamp(whole_secs, nanos)
            .map(Self)
            .ok_or_else(|| TimestampError::OutOfRange(secs.to_string()))
    }

    /// Seconds since the Unix epoch (floor for pre-epoch sub-second values).
    pub fn epoch_seconds(&self) -> i64 {
        self.0.timestamp()
    }

    /// Borrow the underlying instant.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Consume into the underlying instant.
    pub fn into_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl FromStr for SentAt {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TimestampError::Empty);
        }

        let digits = s.strip_prefix('-').unwrap_or(s);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            let secs: i64 = s.parse().map_err(|_| TimestampError::OutOfRange(s.to_string()))?;
            return Self::from_epoch_seconds(secs);
        }

        DateTime::parse_from_rfc3339(s)
            .map(|parsed| Self(parsed.with_timezone(&Utc)))
            .map_err(|e| TimestampError::Invalid {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl From<DateTime<Utc>> for SentAt {
    fn from(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl From<SentAt> for DateTime<Utc> {
    fn from(sent_at: SentAt) -> Self {
        sent_at.0
    }
}

impl fmt::Display for SentAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::SentAt;

    /// Accepted JSON shapes for `sent_at`.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSentAt {
        Whole(i64),
        Fractional(f64),
        Text(String),
    }

    impl<'de> Deserialize<'de> for SentAt {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let resolved = match RawSentAt::deserialize(deserializer)? {
                RawSentAt::Whole(secs) => SentAt::from_epoch_seconds(secs),
                RawSentAt::Fractional(secs) => SentAt::from_epoch_seconds_f64(secs),
                RawSentAt::Text(text) => text.parse(),
            };
            resolved.map_err(D::Error::custom)
        }
    }

    impl Serialize for SentAt {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(&self.0.to_rfc3339())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_utc() {
        let t: SentAt = "2024-01-01T12:00:00Z".parse().unwrap();
        assert_eq!(t.epoch_seconds(), 1_704_110_400);
    }

    #[test]
    fn parses_rfc3339_with_offset_into_utc() {
        let t: SentAt = "2024-01-01T12:00:00-05:00".parse().unwrap();
        assert_eq!(t.epoch_seconds(), 1_704_128_400);
    }

    #[test]
    fn parses_integer_string_as_epoch_seconds() {
        let t: SentAt = "120".parse().unwrap();
        assert_eq!(t.epoch_seconds(), 120);

        let before_epoch: SentAt = "-30".parse().unwrap();
        assert_eq!(before_epoch.epoch_seconds(), -30);
    }

    #[test]
    fn empty_string_is_rejected() {
        assert_eq!("".parse::<SentAt>(), Err(TimestampError::Empty));
        assert_eq!("   ".parse::<SentAt>(), Err(TimestampError::Empty));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = "yesterday".parse::<SentAt>().unwrap_err();
        assert!(matches!(err, TimestampError::Invalid { .. }));

        assert!("-".parse::<SentAt>().is_err());
        assert!("2024-13-01T00:00:00Z".parse::<SentAt>().is_err());
    }

    #[test]
    fn huge_epoch_is_out_of_range() {
        assert!(matches!(
            SentAt::from_epoch_seconds(i64::MAX),
            Err(TimestampError::OutOfRange(_))
        ));
        assert!(matches!(
            "99999999999999999999999".parse::<SentAt>(),
            Err(TimestampError::OutOfRange(_))
        ));
    }

    #[test]
    fn fractional_epoch_keeps_subsecond_part() {
        let t = SentAt::from_epoch_seconds_f64(90.25).unwrap();
        assert_eq!(t.epoch_seconds(), 90);
        assert_eq!(t.as_datetime().timestamp_subsec_millis(), 250);
    }

    #[test]
    fn fractional_epoch_before_zero_floors() {
        let t = SentAt::from_epoch_seconds_f64(-0.5).unwrap();
        assert_eq!(t.epoch_seconds(), -1);
    }

    #[test]
    fn non_finite_epoch_is_rejected() {
        assert!(SentAt::from_epoch_seconds_f64(f64::NAN).is_err());
        assert!(SentAt::from_epoch_seconds_f64(f64::INFINITY).is_err());
    }

    #[test]
    fn display_is_rfc3339() {
        let t = SentAt::from_epoch_seconds(0).unwrap();
        assert_eq!(t.to_string(), "1970-01-01T00:00:00+00:00");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_every_accepted_shape() {
        let text: SentAt = serde_json::from_str("\"2024-01-01T12:00:00Z\"").unwrap();
        let whole: SentAt = serde_json::from_str("1704110400").unwrap();
        let fractional: SentAt = serde_json::from_str("1704110400.0").unwrap();
        let digits: SentAt = serde_json::from_str("\"1704110400\"").unwrap();

        assert_eq!(text, whole);
        assert_eq!(whole, fractional);
        assert_eq!(fractional, digits);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_rejects_empty_and_wrong_types() {
        assert!(serde_json::from_str::<SentAt>("\"\"").is_err());
        assert!(serde_json::from_str::<SentAt>("true").is_err());
        assert!(serde_json::from_str::<SentAt>("{}").is_err());
    }
}
