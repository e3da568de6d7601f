//! open.er-api.com compatible exchange rate client.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use pricing_types::{CurrencyCode, FeedError, RateSource};

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

pub struct ExchangeRateApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ExchangeRateApiClient {
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
}

fn fetch_error(msg: impl Into<String>) -> FeedError {
    FeedError::RateFetch(msg.into())
}

#[async_trait]
impl RateSource for ExchangeRateApiClient {
    #[instrument(skip(self))]
    async fn latest_rates(&self, base: CurrencyCode) -> Result<HashMap<String, f64>, FeedError> {
        let resp = self
            .http
            .get(format!("{}/v6/latest/{}", self.base_url, base.code()))
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}", status)));
        }

        let body: LatestRatesResponse = resp
            .json()
            .await
            .map_err(|e| fetch_error(format!("malformed response: {}", e)))?;

        match body.result.as_deref() {
            Some("success") => {}
            Some(other) => {
                return Err(fetch_error(
                    body.error_type.unwrap_or_else(|| format!("result {}", other)),
                ));
            }
            None => return Err(fetch_error("response has no result field")),
        }

        if body.rates.is_empty() {
            return Err(fetch_error("response has no rates"));
        }

        debug!(count = body.rates.len(), "Fetched live rates");
        Ok(body.rates)
    }
}
