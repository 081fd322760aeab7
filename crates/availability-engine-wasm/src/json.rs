//! JSON-string front end shared by the WASM exports.

use availability_engine::booking::normalize_bookings;
use availability_engine::day::parse_day;
use availability_engine::error::Result;
use availability_engine::history::{history_from_json, HistorySummary};
use availability_engine::{
    filter_history, listings_from_json, quote, report_all, summarize, BookingSpan, DayClock,
    EngineError, HistoryEntry, HistoryFilter, Listing, ListingReport,
};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct HistoryDto<'a> {
    entries: Vec<&'a HistoryEntry>,
    summary: HistorySummary,
}

fn clock_for(timezone: Option<&str>) -> Result<DayClock> {
    match timezone {
        Some(tz) => DayClock::from_name(tz),
        None => Ok(DayClock::default()),
    }
}

/// Clock and reference day from the optional JS arguments.
fn context(today: Option<&str>, timezone: Option<&str>) -> Result<(DayClock, NaiveDate)> {
    let clock = clock_for(timezone)?;
    let today = match today {
        Some(day) => parse_day(day)?,
        None => clock.today(),
    };
    Ok((clock, today))
}

pub fn resolve_listing(
    listing_json: &str,
    today: Option<&str>,
    timezone: Option<&str>,
) -> Result<String> {
    let (clock, today) = context(today, timezone)?;
    let listing = Listing::from_json(listing_json, &clock)?;
    Ok(serde_json::to_string(&ListingReport::build(&listing, today))?)
}

pub fn resolve_listings(
    payload_json: &str,
    today: Option<&str>,
    timezone: Option<&str>,
) -> Result<String> {
    let (clock, today) = context(today, timezone)?;
    let listings = listings_from_json(payload_json, &clock)?;
    Ok(serde_json::to_string(&report_all(&listings, today))?)
}

pub fn quote_rental(
    pickup: Option<&str>,
    return_date: Option<&str>,
    daily_rate: f64,
    timezone: Option<&str>,
) -> Result<String> {
    let clock = clock_for(timezone)?;
    let quote = quote(pickup, return_date, daily_rate, &clock)?;
    Ok(serde_json::to_string(&quote)?)
}

pub fn find_conflicts(
    requested_json: &str,
    bookings_json: &str,
    timezone: Option<&str>,
) -> Result<String> {
    let clock = clock_for(timezone)?;

    let requested: Value = serde_json::from_str(requested_json)?;
    let requested = BookingSpan::from_value(&requested, &clock).ok_or_else(|| {
        EngineError::InvalidDate("requested range needs a pickup and a return date".to_string())
    })?;

    let bookings: Value = serde_json::from_str(bookings_json)?;
    let bookings = match bookings {
        Value::Array(items) => normalize_bookings(&items, &clock),
        other => {
            return Err(EngineError::InvalidListing(format!(
                "expected an array of bookings, got {}",
                other
            )))
        }
    };

    let conflicts = availability_engine::find_conflicts(&requested, &bookings);
    Ok(serde_json::to_string(&conflicts)?)
}

pub fn classify_bookings(
    payload_json: &str,
    filter: Option<&str>,
    today: Option<&str>,
    timezone: Option<&str>,
) -> Result<String> {
    let (clock, today) = context(today, timezone)?;
    let filter = match filter {
        Some(f) => f.parse::<HistoryFilter>().map_err(EngineError::InvalidFilter)?,
        None => HistoryFilter::All,
    };

    let history = history_from_json(payload_json, today, &clock)?;
    let dto = HistoryDto {
        entries: filter_history(&history, filter),
        summary: summarize(&history),
    };
    Ok(serde_json::to_string(&dto)?)
}
