//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use pricing_types::{
    AppError, GeolocationProvider, PlansQuery, QuoteRequest, RateSource, RatesResponse,
};

use super::client_ip::ClientIp;
use crate::PricingService;

/// Application state shared across handlers.
pub struct AppState<G: GeolocationProvider, S: RateSource> {
    pub service: Arc<PricingService<G, S>>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Current exchange rate cache.
#[tracing::instrument(skip(state))]
pub async fn get_rates<G: GeolocationProvider, S: RateSource>(
    State(state): State<Arc<AppState<G, S>>>,
) -> impl IntoResponse {
    let snapshot = state.service.rates();
    Json(RatesResponse::from(snapshot.as_ref()))
}

/// Location profile for the caller.
#[tracing::instrument(skip(state))]
pub async fn get_location<G: GeolocationProvider, S: RateSource>(
    State(state): State<Arc<AppState<G, S>>>,
    ClientIp(ip): ClientIp,
) -> impl IntoResponse {
    Json(state.service.resolve_location(ip).await)
}

/// Price an amount for the caller.
#[tracing::instrument(skip(state), fields(base_price = req.base_price))]
pub async fn quote<G: GeolocationProvider, S: RateSource>(
    State(state): State<Arc<AppState<G, S>>>,
    ClientIp(ip): ClientIp,
    Json(req): Json<QuoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let location = state.service.resolve_location(ip).await;
    let quote = state.service.quote(&req, &location)?;
    tracing::debug!(display = %quote.display, "Quote computed");
    Ok(Json(quote))
}

/// Price the whole catalog for the caller.
#[tracing::instrument(skip(state))]
pub async fn list_plans<G: GeolocationProvider, S: RateSource>(
    State(state): State<Arc<AppState<G, S>>>,
    ClientIp(ip): ClientIp,
    Query(query): Query<PlansQuery>,
) -> impl IntoResponse {
    let location = state.service.resolve_location(ip).await;
    Json(state.service.priced_catalog(
        &location,
        query.currency,
        query.timeline.unwrap_or_default(),
    ))
}
