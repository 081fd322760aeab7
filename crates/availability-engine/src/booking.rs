//! Canonical booking spans.
//!
//! Booking payloads differ between endpoints in what they call the pickup and
//! return dates. [`BookingSpan::from_value`] resolves the aliases once so the
//! rest of the engine only ever sees one record shape.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::day::{DateField, DayClock};

/// Pickup-date keys, in priority order.
pub const PICKUP_ALIASES: [&str; 4] = ["pickupDate", "startDate", "start", "from"];

/// Return-date keys, in priority order.
pub const RETURN_ALIASES: [&str; 4] = ["returnDate", "endDate", "end", "to"];

/// A booking reduced to the two dates that matter for availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSpan {
    pub pickup_date: DateField,
    pub return_date: DateField,
}

impl BookingSpan {
    pub fn new(pickup: NaiveDate, return_date: NaiveDate) -> Self {
        Self {
            pickup_date: DateField::from_day(pickup),
            return_date: DateField::from_day(return_date),
        }
    }

    /// Normalize a raw booking record.
    ///
    /// For each side the first non-null alias wins. Returns `None` when either
    /// side is missing or falsy (`false`, `0`, `""`); unparseable dates are
    /// kept.
    pub fn from_value(value: &Value, clock: &DayClock) -> Option<Self> {
        let obj = value.as_object()?;
        let pickup_date = first_present(obj, &PICKUP_ALIASES)
            .filter(|v| is_truthy(v))
            .and_then(|v| DateField::from_value(v, clock))?;
        let return_date = first_present(obj, &RETURN_ALIASES)
            .filter(|v| is_truthy(v))
            .and_then(|v| DateField::from_value(v, clock))?;
        Some(Self {
            pickup_date,
            return_date,
        })
    }

    /// Both days, when both parsed.
    pub fn days(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.pickup_date.day()?, self.return_date.day()?))
    }

    /// Whether `day` falls inside this booking, both ends inclusive.
    ///
    /// Always false when either date is unparseable.
    pub fn contains(&self, day: NaiveDate) -> bool {
        match self.days() {
            Some((pickup, ret)) => pickup <= day && day <= ret,
            None => false,
        }
    }
}

/// Normalize a list of raw booking records, dropping the ones missing a side.
pub fn normalize_bookings(values: &[Value], clock: &DayClock) -> Vec<BookingSpan> {
    values
        .iter()
        .enumerate()
        .filter_map(|(idx, value)| {
            let span = BookingSpan::from_value(value, clock);
            if span.is_none() {
                log::debug!("dropping booking #{} without pickup/return date", idx);
            }
            span
        })
        .collect()
}

/// The first key in `keys` whose value is present and not `null`.
pub(crate) fn first_present<'a>(
    obj: &'a Map<String, Value>,
    keys: &[&str],
) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

/// Whether a value counts as set: not null, false, zero or an empty string.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
