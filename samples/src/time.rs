use std::cmp::Ordering;
use std::fmt;
use std::ops::Sub;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// Tried in order when no explicit format is configured
const DATETIME_FORMATS: [&str; 7] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// An absolute time, as real-valued seconds since the Unix epoch (UTC). Differences and
/// interpolation never truncate to whole seconds.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Timestamp(f64);

impl Timestamp {
    pub fn from_seconds(secs: f64) -> Self {
        Self(secs)
    }

    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        Self(dt.and_utc().timestamp_micros() as f64 / 1_000_000.0)
    }

    pub fn inner_seconds(self) -> f64 {
        self.0
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Linear interpolation; `pct` 0 is `self`, 1 is `other`
    pub fn lerp(self, other: Timestamp, pct: f64) -> Timestamp {
        Self(self.0 + pct * (other.0 - self.0))
    }

    pub fn cmp_total(&self, other: &Timestamp) -> Ordering {
        self.0.total_cmp(&other.0)
    }

    pub fn to_datetime(self) -> Option<NaiveDateTime> {
        if !self.0.is_finite() {
            return None;
        }
        let secs = self.0.floor();
        let nanos = ((self.0 - secs) * 1_000_000_000.0).round().min(999_999_999.0) as u32;
        DateTime::from_timestamp(secs as i64, nanos).map(|dt| dt.naive_utc())
    }

    /// Just the time of day, like `13:05:09`
    pub fn clock_string(self) -> String {
        match self.to_datetime() {
            Some(dt) => dt.format("%H:%M:%S").to_string(),
            None => "--:--:--".to_string(),
        }
    }

    /// Parses a timestamp. With an explicit chrono format, only that format is tried. Otherwise
    /// RFC 3339, a few common date-time layouts, bare dates, and plain epoch seconds are accepted.
    pub fn parse(raw: &str, format: Option<&str>) -> Result<Timestamp> {
        let raw = raw.trim();
        if let Some(format) = format {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
                return Ok(Self::from_datetime(dt));
            }
            if let Ok(dt) = DateTime::parse_from_str(raw, format) {
                return Ok(Self::from_datetime(dt.naive_utc()));
            }
            bail!("{:?} doesn't match the time format {:?}", raw, format);
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Self::from_datetime(dt.naive_utc()));
        }
        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
                return Ok(Self::from_datetime(dt));
            }
        }
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
                if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                    return Ok(Self::from_datetime(dt));
                }
            }
        }
        if let Ok(secs) = raw.parse::<f64>() {
            if secs.is_finite() {
                return Ok(Self(secs));
            }
        }
        bail!("Can't parse {:?} as a time", raw)
    }
}

impl Sub for Timestamp {
    /// Seconds
    type Output = f64;

    fn sub(self, other: Timestamp) -> f64 {
        self.0 - other.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            None => write!(f, "{}s", self.0),
        }
    }
}
