//! Data Transfer Objects (DTOs) for requests and responses.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use exchange_rates::CurrencyCode;

use crate::domain::{LocationProfile, RateOrigin, RateSnapshot, Timeline};

// ─────────────────────────────────────────────────────────────────────────────
// Quote DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to price an arbitrary PKR amount for the caller.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuoteRequest {
    /// Base price in PKR
    #[schema(example = 38500)]
    pub base_price: f64,
    /// Display currency; defaults to the caller's detected currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
    #[serde(default)]
    pub timeline: Timeline,
    /// Catalog plan this price belongs to; coming-soon plans quote as "SOON"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Starter Website")]
    pub plan_title: Option<String>,
}

/// A computed price.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuoteResponse {
    /// Formatted price, or "SOON"
    #[schema(example = "$ 180")]
    pub display: String,
    pub currency: CurrencyCode,
    /// Rounded amount in `currency`; absent for coming-soon plans
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 180)]
    pub amount: Option<u64>,
    /// Units of `currency` per one PKR used for this quote
    #[schema(example = 0.0036)]
    pub exchange_rate: f64,
    pub markup_applied: bool,
    pub coming_soon: bool,
    pub timeline: Timeline,
    pub location: LocationProfile,
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalog DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Query parameters for the priced catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PlansQuery {
    /// Display currency override
    #[serde(default)]
    pub currency: Option<CurrencyCode>,
    /// Delivery timeline (relaxed, normal, urgent)
    #[serde(default)]
    pub timeline: Option<Timeline>,
}

/// One catalog plan with its displayed price.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlanPrice {
    #[schema(example = "Starter Website")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Base price in PKR before timeline adjustment
    #[schema(example = 38500)]
    pub base_price: u64,
    #[schema(example = "$ 139")]
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    pub coming_soon: bool,
}

/// The full catalog priced for one caller.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlansResponse {
    pub currency: CurrencyCode,
    pub timeline: Timeline,
    pub markup_applied: bool,
    pub location: LocationProfile,
    pub plans: Vec<PlanPrice>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Rate DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Current exchange rate cache.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RatesResponse {
    pub base: CurrencyCode,
    pub origin: RateOrigin,
    /// When live rates were last merged (ISO 8601); absent while on fallback rates
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "2024-01-01T00:00:00Z")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Units of each currency per one PKR
    #[schema(example = json!({"PKR": 1.0, "USD": 0.0036}))]
    pub rates: BTreeMap<String, f64>,
}

impl From<&RateSnapshot> for RatesResponse {
    fn from(snapshot: &RateSnapshot) -> Self {
        Self {
            base: exchange_rates::BASE_CURRENCY,
            origin: snapshot.origin,
            updated_at: snapshot.updated_at,
            rates: snapshot.table.to_map(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_request_defaults() {
        let req: QuoteRequest = serde_json::from_str(r#"{"base_price": 38500}"#).unwrap();
        assert_eq!(req.currency, None);
        assert_eq!(req.timeline, Timeline::Normal);
        assert_eq!(req.plan_title, None);
    }

    #[test]
    fn test_quote_request_full() {
        let req: QuoteRequest = serde_json::from_str(
            r#"{"base_price": 85000, "currency": "GBP", "timeline": "urgent", "plan_title": "Business Website"}"#,
        )
        .unwrap();
        assert_eq!(req.currency, Some(CurrencyCode::GBP));
        assert_eq!(req.timeline, Timeline::Urgent);
    }

    #[test]
    fn test_rates_response_from_initial_snapshot() {
        let resp = RatesResponse::from(&RateSnapshot::initial());
        assert_eq!(resp.origin, RateOrigin::Fallback);
        assert_eq!(resp.updated_at, None);
        assert_eq!(resp.rates.get("PKR"), Some(&1.0));
        assert_eq!(resp.rates.len(), CurrencyCode::all().len());
    }
}
