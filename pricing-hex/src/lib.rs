//! # Pricing Hex
//!
//! Application service layer and HTTP adapter for the pricing service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (rate and location caches, quotes)
//! - `refresher/` - Background task keeping exchange rates fresh
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `G: GeolocationProvider` and `S: RateSource`,
//! allowing different feed implementations to be injected.

pub mod inbound;
pub mod openapi;
pub mod refresher;
pub mod service;


pub use refresher::{RateRefresher, RefreshSchedule};
pub use service::{PricingService, ServiceSettings};
