//! Detect collisions between a requested rental and existing bookings.
//!
//! Rentals are whole days, so ranges are inclusive at both ends: a booking that
//! returns on the day a new one is picked up IS a conflict.

use serde::Serialize;

use crate::booking::BookingSpan;
use crate::day::days_between;

/// An existing booking that collides with the requested range.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub booking: BookingSpan,
    pub overlap_days: i64,
}

/// Find every booking that shares at least one day with `requested`.
///
/// Two spans overlap when `a.pickup <= b.return && b.pickup <= a.return`. The
/// overlap length counts both boundary days. Spans with an unparseable date
/// never conflict.
pub fn find_conflicts(requested: &BookingSpan, bookings: &[BookingSpan]) -> Vec<Conflict> {
    let Some((req_pickup, req_return)) = requested.days() else {
        return Vec::new();
    };

    bookings
        .iter()
        .filter_map(|booking| {
            let (pickup, ret) = booking.days()?;
            if req_pickup <= ret && pickup <= req_return {
                let overlap_start = req_pickup.max(pickup);
                let overlap_end = req_return.min(ret);
                Some(Conflict {
                    booking: booking.clone(),
                    overlap_days: days_between(overlap_start, overlap_end) + 1,
                })
            } else {
                None
            }
        })
        .collect()
}
