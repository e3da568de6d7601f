//! Port traits (interfaces for adapters).
//!
//! These are the contracts the outbound feeds must implement.
//! The application layer depends on these traits, not concrete implementations.

mod geolocation;
mod rates;

pub use geolocation::GeolocationProvider;
pub use rates::RateSource;
