//! Error types for availability-engine operations.

use thiserror::Error;

use crate::quote::QuoteError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// The payload was not valid JSON.
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// The payload was valid JSON but not shaped like a listing.
    #[error("Invalid listing: {0}")]
    InvalidListing(String),

    #[error("Invalid history filter: {0}")]
    InvalidFilter(String),

    #[error(transparent)]
    Quote(#[from] QuoteError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
