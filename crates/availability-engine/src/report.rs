//! Everything a listing card needs, computed in one pass.

use chrono::NaiveDate;
use serde::Serialize;

use crate::badge::AvailabilityBadge;
use crate::listing::Listing;
use crate::meta::{available_meta, is_bookable};
use crate::resolver::{resolve, EffectiveAvailability};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingReport {
    pub id: Option<String>,
    pub name: String,
    pub availability: EffectiveAvailability,
    pub badge: String,
    pub badge_detail: Option<String>,
    pub free_on: Option<NaiveDate>,
    pub days_until_available: Option<i64>,
    pub bookable: bool,
}

impl ListingReport {
    pub fn build(listing: &Listing, today: NaiveDate) -> Self {
        let availability = resolve(listing, today);
        let badge = AvailabilityBadge::from_effective(&availability);
        let meta = available_meta(&availability, today);

        Self {
            id: listing.id.clone(),
            name: listing.display_name(),
            bookable: is_bookable(listing, &availability),
            badge: badge.to_string(),
            badge_detail: badge.detail(today),
            free_on: meta.map(|m| m.free_on),
            days_until_available: meta.map(|m| m.days_until_available),
            availability,
        }
    }
}

/// Reports for a page of listings, in input order.
pub fn report_all(listings: &[Listing], today: NaiveDate) -> Vec<ListingReport> {
    listings.iter().map(|listing| ListingReport::build(listing, today)).collect()
}
