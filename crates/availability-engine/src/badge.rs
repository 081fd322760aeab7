//! The availability badge shown on listing cards.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::day::{format_day, DateField};
use crate::listing::AvailabilityState;
use crate::meta::free_again;
use crate::resolver::EffectiveAvailability;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AvailabilityBadge {
    /// Bookable, optionally with the day the next reservation begins.
    Available { booked_from: Option<DateField> },
    /// Bookable for a limited number of days before the next reservation.
    AvailableFor { days: f64, until: Option<DateField> },
    /// Booked, with no end date known.
    Booked,
    /// Booked through a known day.
    BookedUntil { free_on: NaiveDate },
    /// Booked, but the end date could not be parsed.
    BookedThrough { until: DateField },
    /// A reservation starts today.
    BookedStartsToday,
}

impl AvailabilityBadge {
    pub fn from_effective(effective: &EffectiveAvailability) -> Self {
        match &effective.state {
            Some(AvailabilityState::Booked) => match (&effective.until, free_again(effective)) {
                (Some(_), Some(free_on)) => Self::BookedUntil { free_on },
                (Some(until), None) => Self::BookedThrough { until: until.clone() },
                (None, _) => Self::Booked,
            },
            Some(AvailabilityState::AvailableUntilReservation) => match effective.days_available {
                Some(days) if days == 0.0 => Self::BookedStartsToday,
                Some(days) if days.is_finite() && days > 0.0 => Self::AvailableFor {
                    days,
                    until: effective.next_booking_starts.clone(),
                },
                _ => Self::Available {
                    booked_from: effective.next_booking_starts.clone(),
                },
            },
            _ => Self::Available { booked_from: None },
        }
    }

    pub fn is_booked(&self) -> bool {
        matches!(
            self,
            Self::Booked
                | Self::BookedUntil { .. }
                | Self::BookedThrough { .. }
                | Self::BookedStartsToday
        )
    }

    /// The secondary line under the badge, if any.
    pub fn detail(&self, today: NaiveDate) -> Option<String> {
        match self {
            Self::BookedUntil { free_on } => {
                Some(format!("Free on {}", format_day(*free_on, today)))
            }
            Self::BookedThrough { until } => Some(format!("until {}", display_date(until, today))),
            Self::Available {
                booked_from: Some(from),
            } => Some(format!("Booked from {}", display_date(from, today))),
            Self::AvailableFor { until: Some(until), .. } => {
                Some(format!("until {}", display_date(until, today)))
            }
            _ => None,
        }
    }
}

impl fmt::Display for AvailabilityBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available { .. } => f.write_str("Available"),
            Self::AvailableFor { days, .. } => write!(f, "Available ({})", plural(*days, "day")),
            Self::Booked | Self::BookedUntil { .. } | Self::BookedThrough { .. } => {
                f.write_str("Booked")
            }
            Self::BookedStartsToday => f.write_str("Booked (Starts Today)"),
        }
    }
}

fn plural(n: f64, singular: &str) -> String {
    if n == 1.0 {
        format!("1 {}", singular)
    } else {
        format!("{} {}s", n, singular)
    }
}

fn display_date(field: &DateField, today: NaiveDate) -> String {
    match field.day() {
        Some(day) => format_day(day, today),
        None => field.raw().to_string(),
    }
}
