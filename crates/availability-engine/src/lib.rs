//! # availability-engine
//!
//! Day-granular availability resolution for a parking-spot and vehicle booking
//! client.
//!
//! The booking API returns listings with embedded bookings, a precomputed
//! availability descriptor, both, or neither, and it names booking dates
//! differently depending on the endpoint. This crate normalizes those payloads
//! once and answers the questions the client asks of them: is the listing
//! bookable today, when is it free again, what does its badge say, what does a
//! rental cost, and where does each past booking stand.
//!
//! ## Modules
//!
//! - [`day`]: Date parsing onto calendar days, `DayClock` timezone projection
//! - [`booking`]: Canonical `BookingSpan` with pickup/return alias resolution
//! - [`listing`]: `Listing` and `AvailabilityDescriptor` normalization
//! - [`resolver`]: `resolve`: effective availability on a given day
//! - [`meta`]: Free-again day, days until available, bookability
//! - [`badge`]: The listing card's availability badge
//! - [`report`]: All of the above for a listing card in one value
//! - [`conflict`]: Inclusive-day overlap between a request and bookings
//! - [`quote`]: Date-range validation and rental pricing
//! - [`history`]: Booking history classification and filtering
//! - [`error`]: Error types

pub mod badge;
pub mod booking;
pub mod conflict;
pub mod day;
pub mod error;
pub mod history;
pub mod listing;
pub mod meta;
pub mod quote;
pub mod report;
pub mod resolver;

pub use badge::AvailabilityBadge;
pub use booking::BookingSpan;
pub use conflict::{find_conflicts, Conflict};
pub use day::{DateField, DayClock};
pub use error::EngineError;
pub use history::{filter_history, summarize, BookingStatus, HistoryEntry, HistoryFilter};
pub use listing::{listings_from_json, listings_from_value, AvailabilityState, Listing};
pub use meta::{days_until_available, free_again, is_bookable};
pub use quote::{quote, Quote, QuoteError};
pub use report::{report_all, ListingReport};
pub use resolver::{resolve, AvailabilitySource, EffectiveAvailability};
