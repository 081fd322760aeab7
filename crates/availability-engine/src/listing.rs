//! Listings and their precomputed availability descriptors.
//!
//! A listing arrives either from the `/api/cars` endpoints or from the client's
//! local fallback data, and the two disagree on field names. Normalization here
//! produces one [`Listing`] shape for the resolver.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::booking::{first_present, is_truthy, normalize_bookings, BookingSpan};
use crate::day::{DateField, DayClock};
use crate::error::{EngineError, Result};

/// The `state` of an availability descriptor.
///
/// Unknown states are carried verbatim so that newer backends keep working.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityState {
    Booked,
    AvailableUntilReservation,
    FullyAvailable,
    Other(String),
}

impl AvailabilityState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Booked => "booked",
            Self::AvailableUntilReservation => "available_until_reservation",
            Self::FullyAvailable => "fully_available",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for AvailabilityState {
    fn from(s: &str) -> Self {
        match s {
            "booked" => Self::Booked,
            "available_until_reservation" => Self::AvailableUntilReservation,
            "fully_available" => Self::FullyAvailable,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Serialize for AvailabilityState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A listing's precomputed `availability` object.
///
/// The typed fields drive the resolver. `raw` is the object as received, which
/// is what a passed-through descriptor serializes back to.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityDescriptor {
    pub state: Option<AvailabilityState>,
    pub until: Option<DateField>,
    /// `daysAvailable` coerced to a number; `None` when absent or not numeric.
    pub days_available: Option<f64>,
    pub next_booking_starts: Option<DateField>,
    pub raw: Map<String, Value>,
}

impl AvailabilityDescriptor {
    /// Parse a descriptor. Non-object values are treated as absent.
    pub fn from_value(value: &Value, clock: &DayClock) -> Option<Self> {
        let obj = value.as_object()?;

        let state = obj
            .get("state")
            .and_then(Value::as_str)
            .map(AvailabilityState::from);
        let until = obj
            .get("until")
            .filter(|v| is_truthy(v))
            .and_then(|v| DateField::from_value(v, clock));
        let days_available = obj.get("daysAvailable").and_then(coerce_number);
        let next_booking_starts = obj
            .get("nextBookingStarts")
            .filter(|v| is_truthy(v))
            .and_then(|v| DateField::from_value(v, clock));

        Some(Self {
            state,
            until,
            days_available,
            next_booking_starts,
            raw: obj.clone(),
        })
    }
}

/// A bookable parking spot or vehicle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Listing {
    pub id: Option<String>,
    pub make: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    /// Raw `status`; see [`Listing::status_blocks`].
    pub status: Option<Value>,
    pub daily_rate: Option<f64>,
    pub bookings: Vec<BookingSpan>,
    pub availability: Option<AvailabilityDescriptor>,
}

impl Listing {
    /// Normalize a raw listing object.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidListing` if `value` is not a JSON object.
    pub fn from_value(value: &Value, clock: &DayClock) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| {
            EngineError::InvalidListing(format!("expected an object, got {}", kind(value)))
        })?;

        let bookings = match obj.get("bookings") {
            Some(Value::Array(items)) => normalize_bookings(items, clock),
            _ => Vec::new(),
        };

        Ok(Self {
            id: first_present(obj, &["_id", "id"]).and_then(scalar_string),
            make: non_empty_str(obj.get("make")),
            name: non_empty_str(obj.get("name")),
            category: non_empty_str(obj.get("category")),
            status: obj.get("status").filter(|v| !v.is_null()).cloned(),
            daily_rate: first_present(obj, &["price", "dailyRate"]).and_then(number_value),
            bookings,
            availability: obj
                .get("availability")
                .and_then(|v| AvailabilityDescriptor::from_value(v, clock)),
        })
    }

    /// Parse a single listing from a JSON string.
    pub fn from_json(json: &str, clock: &DayClock) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value, clock)
    }

    /// Card title: make and name joined, else the name, else "Unnamed".
    pub fn display_name(&self) -> String {
        match (self.make.as_deref(), self.name.as_deref()) {
            (Some(make), Some(name)) => format!("{} {}", make, name),
            (Some(only), None) | (None, Some(only)) => only.to_string(),
            (None, None) => "Unnamed".to_string(),
        }
    }

    /// Whether `status` takes the listing off the market. Any set value other
    /// than `"available"` does; `null`, `false`, `0` and `""` count as unset.
    pub fn status_blocks(&self) -> bool {
        match &self.status {
            Some(status) if is_truthy(status) => status.as_str() != Some("available"),
            _ => false,
        }
    }

    /// Daily rate for quoting; a missing rate is zero.
    pub fn rate(&self) -> f64 {
        self.daily_rate.unwrap_or(0.0)
    }
}

/// Read listings out of an API response.
///
/// Accepts a bare array, `{data: [...]}`, `{data: {...}}`, or a single listing
/// object.
pub fn listings_from_value(value: &Value, clock: &DayClock) -> Result<Vec<Listing>> {
    let payload = match value.get("data") {
        Some(data) if !data.is_null() => data,
        _ => value,
    };

    match payload {
        Value::Array(items) => items
            .iter()
            .map(|item| Listing::from_value(item, clock))
            .collect(),
        Value::Object(_) => Ok(vec![Listing::from_value(payload, clock)?]),
        other => Err(EngineError::InvalidListing(format!(
            "expected a listing or a list of listings, got {}",
            kind(other)
        ))),
    }
}

/// Parse listings from a JSON response body.
pub fn listings_from_json(json: &str, clock: &DayClock) -> Result<Vec<Listing>> {
    let value: Value = serde_json::from_str(json)?;
    listings_from_value(&value, clock)
}

/// Loose numeric coercion: numbers, numeric strings (blank is zero) and
/// booleans. Anything else, or a string that does not parse, is `None`.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| !f.is_nan()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Numbers and numeric strings as `f64`.
pub(crate) fn number_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Identifiers come as strings from the API and as numbers from local data.
pub(crate) fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
