//! # Pricing Client SDK
//!
//! A typed Rust client for the Pricing API.

use pricing_types::{
    CurrencyCode, LocationProfile, PlansResponse, QuoteRequest, QuoteResponse, RatesResponse,
    Timeline,
};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pricing API client.
pub struct PricingClient {
    base_url: String,
    client_ip: Option<String>,
    http: Client,
}

impl PricingClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_ip: None,
            http: Client::new(),
        }
    }

    /// Prices requests as if they came from `ip` (sent as `X-Forwarded-For`).
    pub fn with_client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Gets the server's current exchange rate table.
    pub async fn rates(&self) -> Result<RatesResponse, ClientError> {
        self.get("/api/rates", &[]).await
    }

    /// Gets the location profile the server detects for this caller.
    pub async fn location(&self) -> Result<LocationProfile, ClientError> {
        self.get("/api/location", &[]).await
    }

    /// Prices an arbitrary PKR amount.
    pub async fn quote(&self, req: &QuoteRequest) -> Result<QuoteResponse, ClientError> {
        self.post("/api/quote", req).await
    }

    /// Prices the plan catalog, optionally in a specific currency and timeline.
    pub async fn plans(
        &self,
        currency: Option<CurrencyCode>,
        timeline: Option<Timeline>,
    ) -> Result<PlansResponse, ClientError> {
        let mut query = Vec::new();
        if let Some(currency) = currency {
            query.push(("currency", currency.to_string()));
        }
        if let Some(timeline) = timeline {
            query.push(("timeline", timeline.to_string()));
        }
        self.get("/api/plans", &query).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let mut req = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query);
        if let Some(ip) = &self.client_ip {
            req = req.header("X-Forwarded-For", ip);
        }
        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let mut req = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body);
        if let Some(ip) = &self.client_ip {
            req = req.header("X-Forwarded-For", ip);
        }
        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
