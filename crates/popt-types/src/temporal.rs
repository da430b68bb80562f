use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// ISO-8601 timestamp as stored in history and template documents.
///
/// Timestamps are kept as the exact string that was persisted or imported so
/// that foreign documents survive a load/save cycle unchanged. Timestamps
/// produced locally are RFC 3339 in UTC with millisecond precision
/// (`2024-05-01T12:00:00.000Z`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Timestamp for the current wall-clock time.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Format a UTC datetime.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// The raw string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the timestamp is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse as RFC 3339. Returns `None` for foreign or malformed values.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.0)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Calendar date in UTC, if the timestamp parses.
    pub fn date(&self) -> Option<NaiveDate> {
        self.to_datetime().map(|dt| dt.date_naive())
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Timestamp {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Timestamp {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_with_millis_and_z() {
        let dt = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let ts = Timestamp::from_datetime(dt);
        assert_eq!(ts.as_str(), "2024-05-01T12:30:00.000Z");
    }

    #[test]
    fn parses_back_to_datetime() {
        let dt = Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap();
        let ts = Timestamp::from(dt);
        assert_eq!(ts.to_datetime(), Some(dt));
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2023, 1, 2));
    }

    #[test]
    fn foreign_values_are_preserved() {
        let ts = Timestamp::from("t");
        assert_eq!(ts.as_str(), "t");
        assert!(ts.to_datetime().is_none());
        assert!(ts.date().is_none());
    }

    #[test]
    fn serializes_as_plain_string() {
        let ts = Timestamp::from("2024-01-01T00:00:00.000Z");
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2024-01-01T00:00:00.000Z\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn now_is_parseable() {
        assert!(Timestamp::now().to_datetime().is_some());
    }
}
