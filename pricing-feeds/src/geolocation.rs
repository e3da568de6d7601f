//! ip-api.com compatible geolocation client.

use std::net::IpAddr;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use pricing_types::{FeedError, GeoLocation, GeolocationProvider};

/// Only these fields are requested from the provider.
const FIELDS: &str = "status,message,countryCode,currency";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiResponse {
    status: Option<String>,
    message: Option<String>,
    country_code: Option<String>,
    currency: Option<String>,
}

pub struct IpApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl IpApiClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = crate::build_http_client(crate::DEFAULT_TIMEOUT)?;
        Ok(Self::with_client(base_url, http))
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: crate::trim_base_url(base_url),
            http,
        }
    }

    fn url_for(&self, ip: Option<IpAddr>) -> String {
        match ip {
            Some(ip) => format!("{}/json/{}", self.base_url, ip),
            None => format!("{}/json/", self.base_url),
        }
    }
}

fn lookup_error(msg: impl Into<String>) -> FeedError {
    FeedError::LocationLookup(msg.into())
}

#[async_trait]
impl GeolocationProvider for IpApiClient {
    #[instrument(skip(self))]
    async fn lookup(&self, ip: Option<IpAddr>) -> Result<GeoLocation, FeedError> {
        let resp = self
            .http
            .get(self.url_for(ip))
            .query(&[("fields", FIELDS)])
            .send()
            .await
            .map_err(|e| lookup_error(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(lookup_error(format!("HTTP {}", status)));
        }

        let body: IpApiResponse = resp
            .json()
            .await
            .map_err(|e| lookup_error(format!("malformed response: {}", e)))?;

        if let Some(status) = body.status.as_deref() {
            if status != "success" {
                return Err(lookup_error(
                    body.message.unwrap_or_else(|| format!("status {}", status)),
                ));
            }
        }

        let country_code = body
            .country_code
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| lookup_error("response has no countryCode"))?;

        debug!(country = %country_code, currency = ?body.currency, "Geolocation resolved");

        Ok(GeoLocation {
            country_code,
            currency: body.currency,
        })
    }
}
