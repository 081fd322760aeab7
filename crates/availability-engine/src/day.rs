//! Day-granularity date handling.
//!
//! The booking API is not consistent about how it sends dates: some endpoints
//! return RFC 3339 instants, some return naive local datetimes, the booking form
//! posts plain `YYYY-MM-DD` strings, and the local fallback data occasionally
//! carries epoch milliseconds. Everything is projected onto a calendar day in the
//! configured timezone, because availability is only ever decided per day.
//!
//! A date that cannot be parsed is kept as a [`DateField`] with no day. Every
//! comparison against it is false, so a malformed date never blocks a booking.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{EngineError, Result};

/// Naive datetime layouts accepted after RFC 3339 has been tried.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Projects instants onto calendar days in a fixed timezone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayClock {
    tz: Tz,
}

impl Default for DayClock {
    fn default() -> Self {
        Self { tz: Tz::UTC }
    }
}

impl DayClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Build a clock from an IANA timezone name (e.g., "Asia/Kolkata").
    ///
    /// # Errors
    /// Returns `EngineError::InvalidTimezone` if the name is not a known IANA zone.
    pub fn from_name(name: &str) -> Result<Self> {
        name.trim()
            .parse::<Tz>()
            .map(Self::new)
            .map_err(|_| EngineError::InvalidTimezone(name.to_string()))
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// The current calendar day in this clock's timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }

    /// Zero the time-of-day of a date string, returning its calendar day.
    ///
    /// Instants with an offset are converted into the clock's timezone first.
    /// Naive datetimes are already wall-clock time and keep their date. Returns
    /// `None` for anything unparseable.
    pub fn start_of_day(&self, raw: &str) -> Option<NaiveDate> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&self.tz).date_naive());
        }

        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
                return Some(ndt.date());
            }
        }

        NaiveDate::parse_from_str(s, DAY_FORMAT).ok()
    }

    /// Calendar day of an epoch-milliseconds timestamp.
    pub fn day_of_millis(&self, millis: i64) -> Option<NaiveDate> {
        DateTime::<Utc>::from_timestamp_millis(millis)
            .map(|dt| dt.with_timezone(&self.tz).date_naive())
    }
}

/// Parse a strict `YYYY-MM-DD` day, as used on the command line and in the
/// booking form.
///
/// # Errors
/// Returns `EngineError::InvalidDate` when the string is not a calendar day.
pub fn parse_day(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DAY_FORMAT)
        .map_err(|e| EngineError::InvalidDate(format!("'{}': {}", raw, e)))
}

/// Whole days from `from` to `to`. Negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// The day after `day`, saturating at the end of chrono's supported range.
pub fn next_day(day: NaiveDate) -> NaiveDate {
    day.checked_add_days(Days::new(1)).unwrap_or(day)
}

/// Short human date: "6 Jan" within `today`'s year, "6 Jan 2025" otherwise.
pub fn format_day(day: NaiveDate, today: NaiveDate) -> String {
    if day.year() == today.year() {
        day.format("%-d %b").to_string()
    } else {
        day.format("%-d %b %Y").to_string()
    }
}

/// A date as received from the API, with its parsed calendar day if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateField {
    raw: String,
    day: Option<NaiveDate>,
}

impl DateField {
    /// Parse a raw date string through the given clock.
    pub fn parse(raw: impl Into<String>, clock: &DayClock) -> Self {
        let raw = raw.into();
        let day = clock.start_of_day(&raw);
        if day.is_none() {
            log::warn!("unparseable date '{}' treated as non-overlapping", raw);
        }
        Self { raw, day }
    }

    pub fn from_day(day: NaiveDate) -> Self {
        Self {
            raw: day.format(DAY_FORMAT).to_string(),
            day: Some(day),
        }
    }

    /// Read a date out of a JSON value.
    ///
    /// `null` and empty strings are absent. Numbers are epoch milliseconds.
    /// Anything else is kept as an unparseable field.
    pub fn from_value(value: &Value, clock: &DayClock) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(Self::parse(s.as_str(), clock)),
            Value::Number(n) => {
                let day = n.as_i64().and_then(|ms| clock.day_of_millis(ms));
                Some(Self {
                    raw: n.to_string(),
                    day,
                })
            }
            other => {
                log::warn!("non-date value {} treated as non-overlapping", other);
                Some(Self {
                    raw: other.to_string(),
                    day: None,
                })
            }
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn day(&self) -> Option<NaiveDate> {
        self.day
    }

    pub fn is_valid(&self) -> bool {
        self.day.is_some()
    }
}

impl Serialize for DateField {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.day {
            Some(day) => serializer.collect_str(&day.format(DAY_FORMAT)),
            None => serializer.serialize_str(&self.raw),
        }
    }
}
