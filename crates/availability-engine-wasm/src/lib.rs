//! WASM bindings for availability-engine.
//!
//! Exposes listing availability, rental quotes, conflict checks and booking
//! history classification to the browser client via `wasm-bindgen`. All complex
//! types cross the boundary as JSON strings.
//!
//! The JSON-level functions live in [`json`] so they can be exercised on native
//! targets; the `#[wasm_bindgen]` exports here only map errors to `JsValue`.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p availability-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/src/wasm/ \
//!   target/wasm32-unknown-unknown/release/availability_engine_wasm.wasm
//! ```

use wasm_bindgen::prelude::*;

pub mod json;

fn to_js(e: availability_engine::EngineError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Resolve a single listing.
///
/// Returns a JSON card report: `{id, name, availability, badge, badgeDetail,
/// freeOn, daysUntilAvailable, bookable}`.
///
/// # Arguments
/// - `listing_json` -- the listing object as returned by `/api/cars/:id`
/// - `today` -- Optional `YYYY-MM-DD`; defaults to the current day in `timezone`
/// - `timezone` -- Optional IANA timezone; defaults to UTC
#[wasm_bindgen(js_name = "resolveListing")]
pub fn resolve_listing(
    listing_json: &str,
    today: Option<String>,
    timezone: Option<String>,
) -> Result<String, JsValue> {
    json::resolve_listing(listing_json, today.as_deref(), timezone.as_deref()).map_err(to_js)
}

/// Resolve every listing in a `/api/cars` response (bare array or `{data}`
/// envelope). Returns a JSON array of card reports.
#[wasm_bindgen(js_name = "resolveListings")]
pub fn resolve_listings(
    payload_json: &str,
    today: Option<String>,
    timezone: Option<String>,
) -> Result<String, JsValue> {
    json::resolve_listings(payload_json, today.as_deref(), timezone.as_deref()).map_err(to_js)
}

/// Validate and price a rental. Returns `{pickupDate, returnDate, rentalDays,
/// dailyRate, total}`; invalid ranges reject with a readable message.
#[wasm_bindgen(js_name = "quoteRental")]
pub fn quote_rental(
    pickup: Option<String>,
    return_date: Option<String>,
    daily_rate: f64,
    timezone: Option<String>,
) -> Result<String, JsValue> {
    json::quote_rental(pickup.as_deref(), return_date.as_deref(), daily_rate, timezone.as_deref())
        .map_err(to_js)
}

/// Find existing bookings that share a day with the requested range.
///
/// `requested_json` is a single booking object and `bookings_json` an array of
/// them; any of the pickup/return aliases are accepted.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(
    requested_json: &str,
    bookings_json: &str,
    timezone: Option<String>,
) -> Result<String, JsValue> {
    json::find_conflicts(requested_json, bookings_json, timezone.as_deref()).map_err(to_js)
}

/// Classify a `/api/bookings/mybooking` response.
///
/// Returns `{entries, summary}` where `entries` is narrowed by `filter`
/// (`all`, `upcoming`, `completed`, `cancelled`) and `summary` counts the whole
/// history.
#[wasm_bindgen(js_name = "classifyBookings")]
pub fn classify_bookings(
    payload_json: &str,
    filter: Option<String>,
    today: Option<String>,
    timezone: Option<String>,
) -> Result<String, JsValue> {
    json::classify_bookings(
        payload_json,
        filter.as_deref(),
        today.as_deref(),
        timezone.as_deref(),
    )
    .map_err(to_js)
}
