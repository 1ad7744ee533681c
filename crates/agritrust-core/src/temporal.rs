//! # UTC Timestamps
//!
//! `Timestamp` is UTC, truncated to whole seconds, and renders as
//! `YYYY-MM-DDTHH:MM:SSZ`. A credential's `created` value is part of its
//! signing input, so JSON accepts only that exact rendering: any other
//! spelling of an instant (fractional seconds, `+00:00`) is rejected
//! instead of being normalized into a value that was never signed.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AgriTrustError;

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC time, truncated.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `DateTime<Utc>`, dropping sub-second precision.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse the canonical `YYYY-MM-DDTHH:MM:SSZ` form.
    ///
    /// Offsets (even `+00:00`) and fractional seconds are rejected, so a
    /// parsed value always re-renders to the input string.
    pub fn parse(s: &str) -> Result<Self, AgriTrustError> {
        if !s.ends_with('Z') {
            return Err(AgriTrustError::Validation(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        let ts = Self::parse_lenient(s)?;
        if ts.to_iso8601() != s {
            return Err(AgriTrustError::Validation(format!(
                "timestamp must be whole seconds as YYYY-MM-DDTHH:MM:SSZ, got: {s:?}"
            )));
        }
        Ok(ts)
    }

    /// Parse any RFC 3339 string, converting to UTC and dropping
    /// sub-second precision. For operator input only; JSON uses [`Self::parse`].
    pub fn parse_lenient(s: &str) -> Result<Self, AgriTrustError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| {
            AgriTrustError::Validation(format!("invalid RFC 3339 timestamp {s:?}: {e}"))
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// The calendar date in UTC.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Render as `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn now_has_no_subseconds() {
        assert_eq!(Timestamp::now().as_datetime().nanosecond(), 0);
    }

    #[test]
    fn from_utc_truncates() {
        let dt = Utc
            .with_ymd_and_hms(2024, 3, 9, 7, 5, 1)
            .unwrap()
            .with_nanosecond(987_000_000)
            .unwrap();
        assert_eq!(Timestamp::from_utc(dt).to_iso8601(), "2024-03-09T07:05:01Z");
    }

    #[test]
    fn strict_parse_rejects_offsets() {
        assert!(Timestamp::parse("2024-03-09T07:05:01Z").is_ok());
        assert!(Timestamp::parse("2024-03-09T07:05:01+00:00").is_err());
        assert!(Timestamp::parse("2024-03-09").is_err());
    }

    #[test]
    fn strict_parse_rejects_fractional_seconds() {
        assert!(Timestamp::parse("2024-03-09T07:05:01.999Z").is_err());
        assert!(Timestamp::parse("2024-03-09T07:05:01.000Z").is_err());
    }

    #[test]
    fn deserialize_rejects_non_canonical_spellings() {
        for raw in [
            r#""2024-03-09T07:05:01.999Z""#,
            r#""2024-03-09T07:05:01+00:00""#,
            r#""2024-03-09T12:05:01+05:00""#,
        ] {
            assert!(serde_json::from_str::<Timestamp>(raw).is_err(), "{raw}");
        }
    }

    #[test]
    fn lenient_parse_converts_to_utc() {
        let ts = Timestamp::parse_lenient("2024-03-09T12:05:01+05:00").unwrap();
        assert_eq!(ts.to_iso8601(), "2024-03-09T07:05:01Z");
    }

    #[test]
    fn serde_rendering_is_stable() {
        let ts = Timestamp::parse("2024-03-09T07:05:01Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, r#""2024-03-09T07:05:01Z""#);
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_iso8601(), ts.to_iso8601());
    }

    #[test]
    fn date_is_utc_calendar_day() {
        let ts = Timestamp::parse("2024-12-31T23:59:59Z").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }
}
