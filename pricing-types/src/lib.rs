//! # Pricing Types
//!
//! Domain types, pricing rules and port traits for the regional pricing service.
//! This crate has ZERO external IO dependencies - only data structures,
//! the price computation itself, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types and rules (LocationProfile, PricingPlan, compute_price)
//! - `ports/` - Trait definitions that the geolocation and rate feeds implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Feed and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    BASE_COUNTRY, COMING_SOON, GeoLocation, LocationProfile, MARKUP_RATE, PriceQuote,
    PricingPlan, RateOrigin, RateSnapshot, Refresh, Timeline, compute_price,
    get_timeline_adjusted_price, merge_or_keep, quote_price,
};
pub use dto::*;
pub use error::{AppError, FeedError};
pub use exchange_rates::{BASE_CURRENCY, CurrencyCode, ExchangeRateTable, Money};
pub use ports::{GeolocationProvider, RateSource};
