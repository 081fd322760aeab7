//! A user's booking history: normalization, status classification, filtering.
//!
//! `/api/bookings/mybooking` returns records written by several generations of
//! the backend. Some embed the listing as a string, some as a snapshot object,
//! some as a snapshot whose `id` has been populated with the full listing.
//! Dates live either at the top level or under `dates`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::booking::is_truthy;
use crate::day::{days_between, DateField, DayClock};
use crate::error::Result;
use crate::listing::{non_empty_str, number_value, scalar_string};

/// Where a booking stands relative to today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingStatus {
    Upcoming,
    Completed,
    Cancelled,
    /// A backend status the client does not know; shown as pending.
    Other(String),
}

impl BookingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Other(s) => s,
        }
    }

    /// Label for the status badge.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Other(_) => "Pending",
        }
    }
}

impl Serialize for BookingStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Classify a raw backend status.
///
/// Live bookings (`active`, `pending`) are upcoming while their return day is
/// still ahead of `today`, completed otherwise. A missing or unparseable return
/// date counts as completed.
pub fn classify_status(
    raw_status: &str,
    return_day: Option<NaiveDate>,
    today: NaiveDate,
) -> BookingStatus {
    match raw_status {
        "active" | "pending" => match return_day {
            Some(day) if day > today => BookingStatus::Upcoming,
            _ => BookingStatus::Completed,
        },
        "upcoming" => BookingStatus::Upcoming,
        "completed" => BookingStatus::Completed,
        "cancelled" => BookingStatus::Cancelled,
        other => BookingStatus::Other(other.to_string()),
    }
}

/// One booking in the user's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Option<String>,
    pub listing_name: String,
    pub category: String,
    pub customer: String,
    pub pickup_date: Option<DateField>,
    pub return_date: Option<DateField>,
    pub amount: f64,
    pub status: BookingStatus,
    /// Whole days from pickup to return; zero when either date is unusable.
    pub rental_days: i64,
    pub payment_id: Option<String>,
}

impl HistoryEntry {
    /// Normalize a raw booking record. Non-objects yield `None`.
    pub fn from_value(value: &Value, today: NaiveDate, clock: &DayClock) -> Option<Self> {
        let obj = value.as_object()?;
        let car = car_snapshot(obj.get("car"));
        let dates = obj.get("dates").and_then(Value::as_object);

        let pickup_date = first_truthy(&[
            obj.get("pickupDate"),
            dates.and_then(|d| d.get("pickup")),
            obj.get("pickup"),
        ])
        .and_then(|v| DateField::from_value(v, clock));
        let return_date = first_truthy(&[
            obj.get("returnDate"),
            dates.and_then(|d| d.get("return")),
            obj.get("return"),
        ])
        .and_then(|v| DateField::from_value(v, clock));

        let raw_status = raw_status(obj);
        let return_day = return_date.as_ref().and_then(DateField::day);
        let status = classify_status(&raw_status, return_day, today);

        let rental_days = match (pickup_date.as_ref().and_then(DateField::day), return_day) {
            (Some(pickup), Some(ret)) => days_between(pickup, ret),
            _ => 0,
        };

        let user = obj.get("user");
        let customer = non_empty_str(obj.get("customer"))
            .or_else(|| non_empty_str(user.and_then(|u| u.get("name"))))
            .unwrap_or_else(|| "Guest".to_string());

        Some(Self {
            id: first_truthy(&[obj.get("_id"), obj.get("id")]).and_then(scalar_string),
            listing_name: non_empty_str(car.get("make"))
                .or_else(|| non_empty_str(car.get("name")))
                .unwrap_or_else(|| "Unnamed Space".to_string()),
            category: non_empty_str(car.get("category")).unwrap_or_else(|| "Standard".to_string()),
            customer,
            pickup_date,
            return_date,
            amount: first_truthy(&[obj.get("amount"), obj.get("price"), obj.get("total")])
                .and_then(number_value)
                .unwrap_or(0.0),
            status,
            rental_days,
            payment_id: first_truthy(&[
                obj.get("paymentIntentId"),
                obj.get("paymentId"),
                obj.get("sessionId"),
            ])
            .and_then(scalar_string),
        })
    }

    /// Only bookings that have not started or finished can be cancelled.
    pub fn can_cancel(&self) -> bool {
        self.status == BookingStatus::Upcoming
    }
}

/// Which slice of the history to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryFilter {
    #[default]
    All,
    Upcoming,
    Completed,
    Cancelled,
}

impl HistoryFilter {
    pub fn matches(&self, status: &BookingStatus) -> bool {
        match self {
            Self::All => true,
            Self::Upcoming => *status == BookingStatus::Upcoming,
            Self::Completed => *status == BookingStatus::Completed,
            Self::Cancelled => *status == BookingStatus::Cancelled,
        }
    }
}

impl FromStr for HistoryFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "upcoming" => Ok(Self::Upcoming),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!(
                "unknown filter '{}'; expected one of: all, upcoming, completed, cancelled",
                other
            )),
        }
    }
}

impl fmt::Display for HistoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Upcoming => "upcoming",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        })
    }
}

/// Counts for the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HistorySummary {
    pub total: usize,
    pub upcoming: usize,
    pub completed: usize,
    pub cancelled: usize,
}

pub fn filter_history(entries: &[HistoryEntry], filter: HistoryFilter) -> Vec<&HistoryEntry> {
    entries.iter().filter(|e| filter.matches(&e.status)).collect()
}

pub fn summarize(entries: &[HistoryEntry]) -> HistorySummary {
    entries.iter().fold(
        HistorySummary {
            total: entries.len(),
            ..HistorySummary::default()
        },
        |mut acc, entry| {
            match entry.status {
                BookingStatus::Upcoming => acc.upcoming += 1,
                BookingStatus::Completed => acc.completed += 1,
                BookingStatus::Cancelled => acc.cancelled += 1,
                BookingStatus::Other(_) => {}
            }
            acc
        },
    )
}

/// Read a history response: a bare array, `{data: [...]}` or `{bookings: [...]}`.
/// Any other shape is an empty history.
pub fn history_from_value(value: &Value, today: NaiveDate, clock: &DayClock) -> Vec<HistoryEntry> {
    let items = match value {
        Value::Array(items) => Some(items),
        Value::Object(obj) => obj
            .get("data")
            .and_then(Value::as_array)
            .or_else(|| obj.get("bookings").and_then(Value::as_array)),
        _ => None,
    };

    items
        .map(|items| {
            items
                .iter()
                .filter_map(|item| HistoryEntry::from_value(item, today, clock))
                .collect()
        })
        .unwrap_or_default()
}

pub fn history_from_json(
    json: &str,
    today: NaiveDate,
    clock: &DayClock,
) -> Result<Vec<HistoryEntry>> {
    let value: Value = serde_json::from_str(json)?;
    Ok(history_from_value(&value, today, clock))
}

fn raw_status(obj: &Map<String, Value>) -> String {
    if let Some(status) = non_empty_str(obj.get("status")) {
        return status;
    }
    match obj.get("paymentStatus").and_then(Value::as_str) {
        Some("paid") => "active".to_string(),
        _ => "pending".to_string(),
    }
}

/// The listing snapshot embedded in a booking, with a populated `id` merged in.
fn car_snapshot(car: Option<&Value>) -> Map<String, Value> {
    match car {
        Some(Value::String(name)) => {
            let mut snapshot = Map::new();
            snapshot.insert("name".to_string(), Value::String(name.clone()));
            snapshot
        }
        Some(Value::Object(obj)) => {
            let mut snapshot = obj.clone();
            if let Some(Value::Object(populated)) = snapshot.remove("id") {
                snapshot.extend(populated);
            }
            snapshot
        }
        _ => Map::new(),
    }
}

/// The first candidate that is set: not null, false, zero or an empty string.
fn first_truthy<'a>(candidates: &[Option<&'a Value>]) -> Option<&'a Value> {
    candidates.iter().flatten().copied().find(|value| is_truthy(value))
}
