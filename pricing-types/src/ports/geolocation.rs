//! IP geolocation port.

use std::net::IpAddr;

use crate::domain::GeoLocation;
use crate::error::FeedError;

/// Port trait for IP geolocation services.
#[async_trait::async_trait]
pub trait GeolocationProvider: Send + Sync + 'static {
    /// Looks up the country and local currency for `ip`.
    ///
    /// `None` asks the provider to use the address the request arrives from.
    /// Any failure (network, timeout, malformed body) is a
    /// `FeedError::LocationLookup`.
    async fn lookup(&self, ip: Option<IpAddr>) -> Result<GeoLocation, FeedError>;
}
