//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use pricing_types::dto::{
    PlanPrice, PlansQuery, PlansResponse, QuoteRequest, QuoteResponse, RatesResponse,
};
use pricing_types::{CurrencyCode, LocationProfile, RateOrigin, Timeline};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Current exchange rates (units per one PKR)
#[utoipa::path(
    get,
    path = "/api/rates",
    tag = "rates",
    responses(
        (status = 200, description = "Last known-good rate table", body = RatesResponse),
        (status = 429, description = "Rate limit exceeded")
    )
)]
async fn get_rates() {}

/// Location profile for the caller's IP
#[utoipa::path(
    get,
    path = "/api/location",
    tag = "pricing",
    responses(
        (status = 200, description = "Detected location, or the base profile if lookup failed", body = LocationProfile),
        (status = 429, description = "Rate limit exceeded")
    )
)]
async fn get_location() {}

/// Price a PKR amount for the caller
#[utoipa::path(
    post,
    path = "/api/quote",
    tag = "pricing",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Computed price", body = QuoteResponse),
        (status = 400, description = "Invalid base price"),
        (status = 404, description = "Unknown plan title"),
        (status = 429, description = "Rate limit exceeded")
    )
)]
async fn quote() {}

/// Price every catalog plan for the caller
#[utoipa::path(
    get,
    path = "/api/plans",
    tag = "pricing",
    params(PlansQuery),
    responses(
        (status = 200, description = "Priced catalog", body = PlansResponse),
        (status = 400, description = "Invalid currency or timeline"),
        (status = 429, description = "Rate limit exceeded")
    )
)]
async fn list_plans() {}

/// OpenAPI documentation for the Pricing API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Regional Pricing API",
        version = "1.0.0",
        description = "Converts PKR base prices into the caller's currency.\n\nPrices outside the base currency carry a 30% international markup unless the caller's country is exempt. Exchange rates are refreshed hourly; the last known-good table is used when a refresh fails.",
        license(name = "MIT"),
    ),
    paths(
        health,
        get_rates,
        get_location,
        quote,
        list_plans,
    ),
    components(
        schemas(
            QuoteRequest,
            QuoteResponse,
            PlansResponse,
            PlanPrice,
            RatesResponse,
            RateOrigin,
            LocationProfile,
            CurrencyCode,
            Timeline,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rates", description = "Exchange rate cache"),
        (name = "pricing", description = "Location detection and price quotes"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_all_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/health", "/api/rates", "/api/location", "/api/quote", "/api/plans"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
