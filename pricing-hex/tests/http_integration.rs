//! Integration tests for the HTTP adapter.
//!
//! These drive the full router (rate limiting, client IP extraction,
//! handlers) with in-memory feeds.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use pricing_hex::{PricingService, inbound::HttpServer};
use pricing_types::{CurrencyCode, FeedError, GeoLocation, GeolocationProvider, RateSource};
use tower::ServiceExt;

/// Places every caller in the given country.
struct FixedGeo {
    country: &'static str,
    currency: &'static str,
}

#[async_trait]
impl GeolocationProvider for FixedGeo {
    async fn lookup(&self, _ip: Option<IpAddr>) -> Result<GeoLocation, FeedError> {
        Ok(GeoLocation {
            country_code: self.country.to_string(),
            currency: Some(self.currency.to_string()),
        })
    }
}

struct DownGeo;

#[async_trait]
impl GeolocationProvider for DownGeo {
    async fn lookup(&self, _ip: Option<IpAddr>) -> Result<GeoLocation, FeedError> {
        Err(FeedError::LocationLookup("HTTP 503".into()))
    }
}

struct DownRates;

#[async_trait]
impl RateSource for DownRates {
    async fn latest_rates(&self, _base: CurrencyCode) -> Result<HashMap<String, f64>, FeedError> {
        Err(FeedError::RateFetch("HTTP 503".into()))
    }
}

/// Helper to create a router with the given geolocation and rate limit.
fn create_app<G: GeolocationProvider>(geo: G, requests_per_minute: u32) -> axum::Router {
    let service = Arc::new(PricingService::new(geo, DownRates));
    HttpServer::with_rate_limit(service, requests_per_minute).router()
}

fn uk_app() -> axum::Router {
    create_app(
        FixedGeo {
            country: "GB",
            currency: "GBP",
        },
        100,
    )
}

fn get(uri: &str, ip: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("X-Forwarded-For", ip)
        .body(Body::empty())
        .unwrap()
}

fn post_quote(body: &str, ip: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/quote")
        .header("Content-Type", "application/json")
        .header("X-Forwarded-For", ip)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Endpoints
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health() {
    let response = uk_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_rates_serves_fallback_when_feed_down() {
    let response = uk_app().oneshot(get("/api/rates", "81.2.69.142")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["base"], "PKR");
    assert_eq!(json["origin"], "fallback");
    assert_eq!(json["rates"]["USD"], 0.0036);
    assert_eq!(json["rates"]["PKR"], 1.0);
}

#[tokio::test]
async fn test_location_detected() {
    let response = uk_app().oneshot(get("/api/location", "81.2.69.142")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["country_code"], "GB");
    assert_eq!(json["currency"], "GBP");
    assert_eq!(json["is_exempt_country"], false);
}

#[tokio::test]
async fn test_location_falls_back_to_base() {
    let app = create_app(DownGeo, 100);

    let response = app.oneshot(get("/api/location", "81.2.69.142")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["country_code"], "PK");
    assert_eq!(json["currency"], "PKR");
    assert_eq!(json["is_exempt_country"], true);
}

#[tokio::test]
async fn test_quote_with_markup() {
    let response = uk_app()
        .oneshot(post_quote(
            r#"{"base_price": 38500, "currency": "USD"}"#,
            "81.2.69.142",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["display"], "$ 180");
    assert_eq!(json["amount"], 180);
    assert_eq!(json["markup_applied"], true);
    assert_eq!(json["timeline"], "normal");
}

#[tokio::test]
async fn test_quote_exempt_caller() {
    let app = create_app(DownGeo, 100);

    let response = app
        .oneshot(post_quote(
            r#"{"base_price": 38500, "currency": "USD"}"#,
            "81.2.69.142",
        ))
        .await
        .unwrap();

    let json = json_body(response).await;
    assert_eq!(json["display"], "$ 139");
    assert_eq!(json["markup_applied"], false);
}

#[tokio::test]
async fn test_quote_negative_price_rejected() {
    let response = uk_app()
        .oneshot(post_quote(r#"{"base_price": -5}"#, "81.2.69.142"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], 400);
}

#[tokio::test]
async fn test_quote_unknown_plan_not_found() {
    let response = uk_app()
        .oneshot(post_quote(
            r#"{"base_price": 1000, "plan_title": "Moon Base"}"#,
            "81.2.69.142",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_quote_unsupported_currency_rejected() {
    let response = uk_app()
        .oneshot(post_quote(
            r#"{"base_price": 1000, "currency": "JPY"}"#,
            "81.2.69.142",
        ))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_plans_in_requested_currency() {
    let response = uk_app()
        .oneshot(get("/api/plans?currency=USD&timeline=urgent", "81.2.69.142"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["currency"], "USD");
    assert_eq!(json["timeline"], "urgent");
    assert_eq!(json["markup_applied"], true);

    let plans = json["plans"].as_array().unwrap();
    let starter = plans
        .iter()
        .find(|p| p["title"] == "Starter Website")
        .unwrap();
    // 38500 * 1.2 * 0.0036 * 1.3 = 216.216
    assert_eq!(starter["display"], "$ 216");
    assert!(plans.iter().any(|p| p["display"] == "SOON"));
}

#[tokio::test]
async fn test_plans_default_to_location_currency() {
    let response = uk_app()
        .oneshot(get("/api/plans", "81.2.69.142"))
        .await
        .unwrap();

    let json = json_body(response).await;
    assert_eq!(json["currency"], "GBP");
    assert_eq!(json["timeline"], "normal");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let response = uk_app()
        .oneshot(get("/api-docs/openapi.json", "81.2.69.142"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json["paths"]["/api/quote"].is_object());
}

// ─────────────────────────────────────────────────────────────────────────────
// Rate limiting
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_rate_limiting_returns_429_when_exceeded() {
    let app = create_app(DownGeo, 3);

    for i in 1..=3 {
        let response = app.clone().oneshot(get("/api/rates", "203.0.113.7")).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::OK,
            "Request {} should not be rate limited",
            i
        );
    }

    let response = app.oneshot(get("/api/rates", "203.0.113.7")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let json = json_body(response).await;
    assert_eq!(json["retry_after_seconds"], 60);
    assert!(json["error"].as_str().unwrap().contains("Rate limit exceeded"));
}

#[tokio::test]
async fn test_health_bypasses_rate_limit() {
    let app = create_app(DownGeo, 1);

    for _ in 0..5 {
        let response = app.clone().oneshot(get("/health", "203.0.113.7")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_rate_limits_are_per_client_ip() {
    let app = create_app(DownGeo, 1);

    let first = app.clone().oneshot(get("/api/rates", "203.0.113.7")).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let repeat = app.clone().oneshot(get("/api/rates", "203.0.113.7")).await.unwrap();
    assert_eq!(repeat.status(), StatusCode::TOO_MANY_REQUESTS);

    let other = app.oneshot(get("/api/rates", "198.51.100.9")).await.unwrap();
    assert_eq!(other.status(), StatusCode::OK);
}
