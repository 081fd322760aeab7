//! Effective availability of a listing on a given day.
//!
//! Live bookings win over the backend's precomputed descriptor; the descriptor
//! wins over having no data at all. Dates are compared per calendar day, and a
//! date that failed to parse never overlaps anything, so bad data resolves to
//! "available" rather than blocking the listing.

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::booking::BookingSpan;
use crate::day::DateField;
use crate::listing::{AvailabilityDescriptor, AvailabilityState, Listing};

/// Which rule produced an [`EffectiveAvailability`]. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AvailabilitySource {
    /// A booking on the listing covers today.
    Bookings,
    /// The descriptor was passed through, or said booked until a day.
    Availability,
    /// The descriptor says the next reservation starts today.
    AvailabilityResStartsToday,
    /// Neither bookings nor descriptor said anything.
    None,
}

/// The resolver's verdict for a listing on a given day.
///
/// When the descriptor is passed through, `passthrough` holds it as received
/// and serialization reproduces it key for key, with `source` appended.
/// Otherwise the typed fields are serialized in camelCase.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveAvailability {
    pub state: Option<AvailabilityState>,
    /// Last day the listing is occupied, when booked.
    pub until: Option<DateField>,
    pub days_available: Option<f64>,
    pub next_booking_starts: Option<DateField>,
    pub passthrough: Option<Map<String, Value>>,
    pub source: AvailabilitySource,
}

impl EffectiveAvailability {
    fn fully_available() -> Self {
        Self {
            state: Some(AvailabilityState::FullyAvailable),
            until: None,
            days_available: None,
            next_booking_starts: None,
            passthrough: None,
            source: AvailabilitySource::None,
        }
    }

    fn booked(until: Option<DateField>, source: AvailabilitySource) -> Self {
        Self {
            state: Some(AvailabilityState::Booked),
            until,
            days_available: None,
            next_booking_starts: None,
            passthrough: None,
            source,
        }
    }

    fn passed_through(descriptor: &AvailabilityDescriptor) -> Self {
        Self {
            state: descriptor.state.clone(),
            until: descriptor.until.clone(),
            days_available: descriptor.days_available,
            next_booking_starts: descriptor.next_booking_starts.clone(),
            passthrough: Some(descriptor.raw.clone()),
            source: AvailabilitySource::Availability,
        }
    }

    pub fn is_booked(&self) -> bool {
        self.state == Some(AvailabilityState::Booked)
    }
}

impl Serialize for EffectiveAvailability {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match &self.passthrough {
            Some(raw) => {
                for (key, value) in raw.iter().filter(|(key, _)| key.as_str() != "source") {
                    map.serialize_entry(key, value)?;
                }
            }
            None => {
                if let Some(state) = &self.state {
                    map.serialize_entry("state", state)?;
                }
                if let Some(until) = &self.until {
                    map.serialize_entry("until", until)?;
                }
                if let Some(days) = self.days_available {
                    map.serialize_entry("daysAvailable", &days)?;
                }
                if let Some(next) = &self.next_booking_starts {
                    map.serialize_entry("nextBookingStarts", next)?;
                }
            }
        }
        map.serialize_entry("source", &self.source)?;
        map.end()
    }
}

/// Resolve a listing's availability on `today`.
///
/// Never fails. Rules, first match wins:
///
/// 1. A booking covering `today` (inclusive both ends) makes the listing booked
///    until the latest return date among such bookings.
/// 2. Otherwise the descriptor: `booked` with an `until` is booked until then;
///    `available_until_reservation` with zero days left is booked from today;
///    anything else passes through.
/// 3. Otherwise the listing is fully available.
pub fn resolve(listing: &Listing, today: NaiveDate) -> EffectiveAvailability {
    if let Some(span) = latest_covering(&listing.bookings, today) {
        log::debug!(
            "listing {:?} booked through {} by an embedded booking",
            listing.id,
            span.return_date.raw()
        );
        return EffectiveAvailability::booked(
            Some(span.return_date.clone()),
            AvailabilitySource::Bookings,
        );
    }

    let Some(descriptor) = &listing.availability else {
        return EffectiveAvailability::fully_available();
    };

    match (&descriptor.state, &descriptor.until) {
        (Some(AvailabilityState::Booked), Some(until)) => {
            EffectiveAvailability::booked(Some(until.clone()), AvailabilitySource::Availability)
        }
        (Some(AvailabilityState::AvailableUntilReservation), _)
            if descriptor.days_available == Some(0.0) =>
        {
            log::debug!("listing {:?} has a reservation starting today", listing.id);
            EffectiveAvailability {
                next_booking_starts: descriptor.next_booking_starts.clone(),
                ..EffectiveAvailability::booked(
                    descriptor.until.clone(),
                    AvailabilitySource::AvailabilityResStartsToday,
                )
            }
        }
        _ => EffectiveAvailability::passed_through(descriptor),
    }
}

/// Among the bookings covering `today`, the one that ends last.
fn latest_covering(bookings: &[BookingSpan], today: NaiveDate) -> Option<&BookingSpan> {
    bookings
        .iter()
        .filter(|span| span.contains(today))
        .max_by_key(|span| span.return_date.day())
}
