//! Clinical timestamps
//!
//! Bundles carry FHIR `date` and `dateTime` strings. Two forms are accepted:
//!
//! - `YYYY-MM-DD`, read as midnight UTC
//! - RFC 3339 date-time with an explicit offset, e.g. `2024-01-05T08:30:00+01:00`
//!
//! Partial dates (`2024`, `2024-01`) and date-times without an offset are
//! rejected with [`CoreError::InvalidTimestamp`] rather than guessed at.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CoreError, Result};

const SECONDS_PER_DAY: i64 = 86_400;

/// A point in time parsed from a bundle
#[derive(Debug, Clone, Copy)]
pub struct Timestamp {
    instant: DateTime<FixedOffset>,
    date_only: bool,
}

impl Timestamp {
    /// Parse one of the accepted forms
    pub fn parse(raw: &str) -> Result<Self> {
        if is_plain_date(raw) {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| CoreError::invalid_timestamp(raw))?;
            let instant = date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| CoreError::invalid_timestamp(raw))?
                .and_utc()
                .fixed_offset();
            return Ok(Self {
                instant,
                date_only: true,
            });
        }

        // chrono also accepts a space or lowercase `t` as separator
        if raw.as_bytes().get(10) != Some(&b'T') || !is_plain_date(&raw[..10]) {
            return Err(CoreError::invalid_timestamp(raw));
        }

        let instant =
            DateTime::parse_from_rfc3339(raw).map_err(|_| CoreError::invalid_timestamp(raw))?;
        Ok(Self {
            instant,
            date_only: false,
        })
    }

    /// Whole days from `self` to `later`, rounded towards negative infinity
    pub fn days_until(&self, later: &Timestamp) -> i64 {
        let delta = later.instant - self.instant;
        // num_seconds truncates towards zero; a negative remainder means one more second back
        let seconds = delta.num_seconds() - i64::from(delta.subsec_nanos() < 0);
        seconds.div_euclid(SECONDS_PER_DAY)
    }

    /// Calendar date in the timestamp's own offset
    pub fn date(&self) -> NaiveDate {
        self.instant.date_naive()
    }

    pub fn year(&self) -> i32 {
        self.date().year()
    }

    pub fn is_date_only(&self) -> bool {
        self.date_only
    }
}

/// `YYYY-MM-DD` by shape only; calendar validity is left to chrono
fn is_plain_date(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.instant == other.instant
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant.cmp(&other.instant)
    }
}

impl FromStr for Timestamp {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.date_only {
            write!(f, "{}", self.instant.format("%Y-%m-%d"))
        } else {
            f.write_str(&self.instant.to_rfc3339_opts(SecondsFormat::AutoSi, false))
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(raw: &str) -> Timestamp {
        Timestamp::parse(raw).unwrap()
    }

    #[test]
    fn test_date_only() {
        let t = ts("2024-01-05");
        assert!(t.is_date_only());
        assert_eq!(t.year(), 2024);
        assert_eq!(t.to_string(), "2024-01-05");
    }

    #[test]
    fn test_datetime_with_offset() {
        let t = ts("2024-01-05T08:30:00+01:00");
        assert!(!t.is_date_only());
        assert_eq!(t.to_string(), "2024-01-05T08:30:00+01:00");
        assert_eq!(ts("2024-01-05T07:30:00Z"), t);
    }

    #[test]
    fn test_fractional_seconds() {
        let t = ts("2015-02-07T13:28:17.239+02:00");
        assert_eq!(t.date(), NaiveDate::from_ymd_opt(2015, 2, 7).unwrap());
    }

    #[test]
    fn test_rejects_other_forms() {
        for raw in [
            "",
            "2024",
            "2024-01",
            "2024-1-05",
            "2024-02-30",
            "2024-01-05T08:30:00",
            "2024-01-05 08:30:00+00:00",
            "2024-01-05t08:30:00Z",
            " 2024-01-05",
            "2024-01-05Tgarbage",
            "not a date",
        ] {
            let err = Timestamp::parse(raw).unwrap_err();
            assert!(
                matches!(err, CoreError::InvalidTimestamp { ref value } if value == raw),
                "expected InvalidTimestamp for {raw:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_days_until_floors() {
        let a = ts("2024-01-05T12:00:00Z");
        assert_eq!(a.days_until(&ts("2024-01-20")), 14);
        assert_eq!(a.days_until(&ts("2024-01-06T12:00:00Z")), 1);
        assert_eq!(a.days_until(&ts("2024-01-05T18:00:00Z")), 0);
        assert_eq!(a.days_until(&ts("2024-01-05T06:00:00Z")), -1);
        assert_eq!(ts("2024-01-05").days_until(&ts("2024-01-20")), 15);
    }

    #[test]
    fn test_days_until_floors_sub_second_gaps() {
        let a = ts("2024-01-05T12:00:00.5Z");
        assert_eq!(a.days_until(&ts("2024-01-05T12:00:00Z")), -1);
        assert_eq!(a.days_until(&ts("2024-01-05T12:00:00.75Z")), 0);
        assert_eq!(ts("2024-01-06T00:00:00.001Z").days_until(&ts("2024-01-05")), -1);
    }

    #[test]
    fn test_serde_round_trip_keeps_form() {
        let json = serde_json::to_string(&ts("2024-03-01")).unwrap();
        assert_eq!(json, "\"2024-03-01\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert!(back.is_date_only());

        let bad: std::result::Result<Timestamp, _> = serde_json::from_str("\"yesterday\"");
        assert!(bad.is_err());
    }
}
