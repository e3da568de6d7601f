//! # Pricing Feeds
//!
//! Outbound HTTP adapters for the pricing service.
//! This crate provides the reqwest clients that implement the
//! `GeolocationProvider` and `RateSource` ports.

use std::time::Duration;

pub mod geolocation;
pub mod rates;

#[cfg(test)]
mod feed_tests;

pub use geolocation::IpApiClient;
pub use rates::ExchangeRateApiClient;

/// Default request timeout for both feeds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Both outbound feeds, sharing one connection pool.
pub struct Feeds {
    pub geolocation: IpApiClient,
    pub rates: ExchangeRateApiClient,
}

/// Build both feed clients.
///
/// Every request made through them is bounded by `timeout`; expiry surfaces
/// as an ordinary feed error.
///
/// # Examples
///
/// ```ignore
/// let feeds = build_feeds("http://ip-api.com", "https://open.er-api.com", DEFAULT_TIMEOUT)?;
/// ```
pub fn build_feeds(geo_url: &str, rates_url: &str, timeout: Duration) -> anyhow::Result<Feeds> {
    let http = build_http_client(timeout)?;
    Ok(Feeds {
        geolocation: IpApiClient::with_client(geo_url, http.clone()),
        rates: ExchangeRateApiClient::with_client(rates_url, http),
    })
}

/// Build a reqwest client with the given request timeout.
pub fn build_http_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("pricing-feeds/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

fn trim_base_url(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_string()
}
