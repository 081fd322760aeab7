//! Tests for derived values: free-again day, bookability, badge, card report.

use availability_engine::meta::available_meta;
use availability_engine::{
    days_until_available, free_again, is_bookable, resolve, AvailabilityBadge, BookingSpan,
    DayClock, Listing, ListingReport,
};
use chrono::NaiveDate;
use serde_json::json;

fn day(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn listing_from(value: serde_json::Value) -> Listing {
    Listing::from_value(&value, &DayClock::default()).unwrap()
}

fn booked_until(until: &str) -> Listing {
    Listing {
        bookings: vec![BookingSpan::new(day("2024-01-01"), day(until))],
        ..Listing::default()
    }
}

// ── Free-again / days until available ───────────────────────────────────────

#[test]
fn free_again_is_day_after_until() {
    let today = day("2024-01-03");
    let eff = resolve(&booked_until("2024-01-05"), today);

    assert_eq!(free_again(&eff), Some(day("2024-01-06")));
    assert_eq!(days_until_available(&eff, today), Some(3));

    let meta = available_meta(&eff, today).unwrap();
    assert_eq!(meta.free_on, day("2024-01-06"));
    assert_eq!(meta.days_until_available, 3);
}

#[test]
fn past_until_yields_non_positive_days() {
    let listing = listing_from(json!({"availability": {"state": "booked", "until": "2024-01-01"}}));
    let today = day("2024-01-05");
    let eff = resolve(&listing, today);

    assert_eq!(free_again(&eff), Some(day("2024-01-02")));
    assert_eq!(days_until_available(&eff, today), Some(-3));
}

#[test]
fn until_on_today_frees_tomorrow() {
    let listing = listing_from(json!({"availability": {"state": "booked", "until": "2024-01-05"}}));
    let eff = resolve(&listing, day("2024-01-05"));

    assert_eq!(days_until_available(&eff, day("2024-01-05")), Some(1));
}

#[test]
fn no_free_again_when_not_booked_or_until_is_bad() {
    let available = resolve(&Listing::default(), day("2024-01-03"));
    assert_eq!(free_again(&available), None);

    let bad = listing_from(json!({"availability": {"state": "booked", "until": "someday"}}));
    let eff = resolve(&bad, day("2024-01-03"));
    assert!(eff.is_booked());
    assert_eq!(free_again(&eff), None);
    assert_eq!(days_until_available(&eff, day("2024-01-03")), None);
}

// ── Bookability ─────────────────────────────────────────────────────────────

#[test]
fn maintenance_status_is_never_bookable() {
    let listing = listing_from(json!({"status": "maintenance"}));
    let eff = resolve(&listing, day("2024-01-03"));

    assert!(!eff.is_booked());
    assert!(!is_bookable(&listing, &eff));
}

#[test]
fn available_status_and_empty_status_are_bookable() {
    for status in [json!("available"), json!(""), json!(null), json!(false), json!(0)] {
        let listing = listing_from(json!({"status": status}));
        let eff = resolve(&listing, day("2024-01-03"));
        assert!(is_bookable(&listing, &eff), "status {:?}", listing.status);
    }
}

#[test]
fn any_other_set_status_blocks_booking() {
    for status in [
        json!("maintenance"),
        json!(true),
        json!(3),
        json!({"code": "maintenance"}),
        json!(["available"]),
    ] {
        let listing = listing_from(json!({"status": status}));
        let eff = resolve(&listing, day("2024-01-03"));
        assert!(!is_bookable(&listing, &eff), "status {:?}", listing.status);
    }
}

#[test]
fn booked_listing_is_not_bookable() {
    let listing = booked_until("2024-01-05");
    let eff = resolve(&listing, day("2024-01-03"));
    assert!(!is_bookable(&listing, &eff));
}

#[test]
fn partial_availability_is_bookable() {
    let listing = listing_from(json!({
        "availability": {"state": "available_until_reservation", "daysAvailable": 2}
    }));
    let eff = resolve(&listing, day("2024-01-03"));
    assert!(is_bookable(&listing, &eff));
}

// ── Badge ───────────────────────────────────────────────────────────────────

#[test]
fn badge_for_booked_with_known_end() {
    let today = day("2024-01-03");
    let eff = resolve(&booked_until("2024-01-05"), today);
    let badge = AvailabilityBadge::from_effective(&eff);

    assert_eq!(badge, AvailabilityBadge::BookedUntil { free_on: day("2024-01-06") });
    assert_eq!(badge.to_string(), "Booked");
    assert_eq!(badge.detail(today).as_deref(), Some("Free on 6 Jan"));
    assert!(badge.is_booked());
}

#[test]
fn badge_for_booked_with_unparseable_end() {
    let listing = listing_from(json!({"availability": {"state": "booked", "until": "TBD"}}));
    let today = day("2024-01-03");
    let badge = AvailabilityBadge::from_effective(&resolve(&listing, today));

    assert!(matches!(badge, AvailabilityBadge::BookedThrough { .. }));
    assert_eq!(badge.detail(today).as_deref(), Some("until TBD"));
}

#[test]
fn badge_for_reservation_starting_today() {
    let listing = listing_from(json!({
        "availability": {"state": "available_until_reservation", "daysAvailable": 0}
    }));
    let eff = resolve(&listing, day("2024-01-03"));
    let badge = AvailabilityBadge::from_effective(&eff);

    // The resolver turns this into a booked state without an end date.
    assert_eq!(badge, AvailabilityBadge::Booked);
    assert_eq!(badge.to_string(), "Booked");
}

#[test]
fn badge_for_limited_availability() {
    let today = day("2024-01-03");
    let one = listing_from(json!({
        "availability": {"state": "available_until_reservation", "daysAvailable": 1, "nextBookingStarts": "2024-01-04"}
    }));
    let many = listing_from(json!({
        "availability": {"state": "available_until_reservation", "daysAvailable": 5, "nextBookingStarts": "2025-02-01"}
    }));

    let one = AvailabilityBadge::from_effective(&resolve(&one, today));
    let many = AvailabilityBadge::from_effective(&resolve(&many, today));

    assert_eq!(one.to_string(), "Available (1 day)");
    assert_eq!(one.detail(today).as_deref(), Some("until 4 Jan"));
    assert_eq!(many.to_string(), "Available (5 days)");
    assert_eq!(many.detail(today).as_deref(), Some("until 1 Feb 2025"));
    assert!(!many.is_booked());
}

#[test]
fn badge_for_fractional_day_count() {
    let listing = listing_from(json!({
        "availability": {"state": "available_until_reservation", "daysAvailable": 1.5}
    }));
    let badge = AvailabilityBadge::from_effective(&resolve(&listing, day("2024-01-03")));

    assert_eq!(badge.to_string(), "Available (1.5 days)");
}

#[test]
fn badge_for_reservation_without_day_count() {
    let today = day("2024-01-03");
    let listing = listing_from(json!({
        "availability": {"state": "available_until_reservation", "nextBookingStarts": "2024-01-20"}
    }));
    let badge = AvailabilityBadge::from_effective(&resolve(&listing, today));

    assert_eq!(badge.to_string(), "Available");
    assert_eq!(badge.detail(today).as_deref(), Some("Booked from 20 Jan"));
}

#[test]
fn badge_for_plain_availability() {
    let badge = AvailabilityBadge::from_effective(&resolve(&Listing::default(), day("2024-01-03")));
    assert_eq!(badge, AvailabilityBadge::Available { booked_from: None });
    assert_eq!(badge.detail(day("2024-01-03")), None);
}

#[test]
fn badge_directly_from_reservation_state() {
    // A caller holding an unresolved descriptor still gets the starts-today badge.
    let eff = availability_engine::EffectiveAvailability {
        state: Some(availability_engine::AvailabilityState::AvailableUntilReservation),
        until: None,
        days_available: Some(0.0),
        next_booking_starts: None,
        passthrough: None,
        source: availability_engine::AvailabilitySource::Availability,
    };

    let badge = AvailabilityBadge::from_effective(&eff);

    assert_eq!(badge, AvailabilityBadge::BookedStartsToday);
    assert_eq!(badge.to_string(), "Booked (Starts Today)");
}

// ── Report ──────────────────────────────────────────────────────────────────

#[test]
fn report_collects_card_values() {
    let listing = listing_from(json!({
        "_id": "spot-9",
        "make": "Level 2",
        "name": "Bay 14",
        "bookings": [{"startDate": "2024-01-01", "endDate": "2024-01-05"}]
    }));

    let report = ListingReport::build(&listing, day("2024-01-03"));

    assert_eq!(report.id.as_deref(), Some("spot-9"));
    assert_eq!(report.name, "Level 2 Bay 14");
    assert_eq!(report.badge, "Booked");
    assert_eq!(report.badge_detail.as_deref(), Some("Free on 6 Jan"));
    assert_eq!(report.free_on, Some(day("2024-01-06")));
    assert_eq!(report.days_until_available, Some(3));
    assert!(!report.bookable);

    let out = serde_json::to_value(&report).unwrap();
    assert_eq!(out["freeOn"], "2024-01-06");
    assert_eq!(out["availability"]["source"], "bookings");
}
