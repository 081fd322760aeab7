//! Price a requested rental.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::booking::BookingSpan;
use crate::day::{days_between, DayClock};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    #[error("Please select both a pickup and a return date")]
    MissingDates,

    #[error("Unrecognized date: {0}")]
    InvalidDate(String),

    #[error("Invalid date range: return {return_date} is before pickup {pickup}")]
    InvalidRange {
        pickup: NaiveDate,
        return_date: NaiveDate,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub rental_days: i64,
    pub daily_rate: f64,
    pub total: f64,
}

impl Quote {
    /// The requested range as a span, for conflict checks.
    pub fn span(&self) -> BookingSpan {
        BookingSpan::new(self.pickup_date, self.return_date)
    }
}

/// Billable days: whole days between the dates, never less than one.
pub fn rental_days(pickup: NaiveDate, return_date: NaiveDate) -> i64 {
    days_between(pickup, return_date).max(1)
}

/// Validate a requested range and price it.
///
/// A negative or non-finite rate is priced as zero.
///
/// # Errors
/// - `QuoteError::MissingDates` if either date is absent or blank.
/// - `QuoteError::InvalidDate` if either date does not parse.
/// - `QuoteError::InvalidRange` if the return day precedes the pickup day.
pub fn quote(
    pickup: Option<&str>,
    return_date: Option<&str>,
    daily_rate: f64,
    clock: &DayClock,
) -> Result<Quote, QuoteError> {
    let (Some(pickup), Some(return_date)) = (non_blank(pickup), non_blank(return_date)) else {
        return Err(QuoteError::MissingDates);
    };

    let pickup_day = clock
        .start_of_day(pickup)
        .ok_or_else(|| QuoteError::InvalidDate(pickup.to_string()))?;
    let return_day = clock
        .start_of_day(return_date)
        .ok_or_else(|| QuoteError::InvalidDate(return_date.to_string()))?;

    if return_day < pickup_day {
        return Err(QuoteError::InvalidRange {
            pickup: pickup_day,
            return_date: return_day,
        });
    }

    let daily_rate = if daily_rate.is_finite() && daily_rate > 0.0 {
        daily_rate
    } else {
        0.0
    };
    let rental_days = rental_days(pickup_day, return_day);

    Ok(Quote {
        pickup_date: pickup_day,
        return_date: return_day,
        rental_days,
        daily_rate,
        total: rental_days as f64 * daily_rate,
    })
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
