//! Values derived from an [`EffectiveAvailability`] for display.

use chrono::NaiveDate;
use serde::Serialize;

use crate::day::{days_between, next_day};
use crate::listing::Listing;
use crate::resolver::EffectiveAvailability;

/// When a booked listing frees up, relative to a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableMeta {
    pub free_on: NaiveDate,
    /// Zero or negative when `until` is already in the past.
    pub days_until_available: i64,
}

/// The day after the last booked day. Only for booked listings whose `until`
/// parsed.
pub fn free_again(effective: &EffectiveAvailability) -> Option<NaiveDate> {
    if !effective.is_booked() {
        return None;
    }
    effective.until.as_ref()?.day().map(next_day)
}

/// Whole days from `today` until the listing is free again.
pub fn days_until_available(effective: &EffectiveAvailability, today: NaiveDate) -> Option<i64> {
    free_again(effective).map(|free_on| days_between(today, free_on))
}

pub fn available_meta(
    effective: &EffectiveAvailability,
    today: NaiveDate,
) -> Option<AvailableMeta> {
    free_again(effective).map(|free_on| AvailableMeta {
        free_on,
        days_until_available: days_between(today, free_on),
    })
}

/// Whether the listing can be booked right now.
///
/// A set `status` other than "available" blocks booking regardless of dates,
/// as does a booked effective state.
pub fn is_bookable(listing: &Listing, effective: &EffectiveAvailability) -> bool {
    !listing.status_blocks() && !effective.is_booked()
}
