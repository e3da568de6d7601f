//! Configuration loading from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use pricing_hex::{RefreshSchedule, ServiceSettings};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub geo_api_url: String,
    pub rates_api_url: String,
    pub http_timeout: Duration,
    pub rate_refresh: Duration,
    pub rate_retry: Duration,
    pub location_ttl: Duration,
    pub location_cache_capacity: usize,
    pub exempt_countries: Vec<String>,
    pub rate_limit_per_minute: u32,
    /// OTLP collector endpoint; span export is disabled when unset.
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let exempt_countries = parse_country_list(
            &lookup("EXEMPT_COUNTRIES").unwrap_or_else(|| "PK".to_string()),
        );

        Ok(Self {
            port: parse_or(&lookup, "PORT", 3000)?,
            geo_api_url: lookup("GEO_API_URL").unwrap_or_else(|| "http://ip-api.com".to_string()),
            rates_api_url: lookup("RATES_API_URL")
                .unwrap_or_else(|| "https://open.er-api.com".to_string()),
            http_timeout: Duration::from_secs(parse_or(&lookup, "HTTP_TIMEOUT_SECS", 5)?),
            rate_refresh: Duration::from_secs(parse_or(&lookup, "RATE_REFRESH_SECS", 3600)?),
            rate_retry: Duration::from_secs(parse_or(&lookup, "RATE_RETRY_SECS", 30)?),
            location_ttl: Duration::from_secs(parse_or(&lookup, "LOCATION_TTL_SECS", 1800)?),
            location_cache_capacity: parse_or(&lookup, "LOCATION_CACHE_CAPACITY", 10_000)?,
            exempt_countries,
            rate_limit_per_minute: parse_or(&lookup, "RATE_LIMIT_PER_MINUTE", 120)?,
            otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|s| !s.trim().is_empty()),
        })
    }

    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            exempt_countries: self.exempt_countries.clone(),
            location_ttl: self.location_ttl,
            location_cache_capacity: self.location_cache_capacity,
            ..ServiceSettings::default()
        }
    }

    pub fn refresh_schedule(&self) -> RefreshSchedule {
        RefreshSchedule {
            interval: self.rate_refresh,
            initial_backoff: self.rate_retry,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", name, raw)),
        None => Ok(default),
    }
}

fn parse_country_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .collect()
}
