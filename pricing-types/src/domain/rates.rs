//! The rate cache as held by the service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use exchange_rates::ExchangeRateTable;

/// Where the rates in a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RateOrigin {
    /// Static table compiled into the binary; no live fetch has succeeded yet.
    Fallback,
    Live,
}

/// Last known-good exchange rates.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    pub table: ExchangeRateTable,
    pub origin: RateOrigin,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RateSnapshot {
    pub fn initial() -> Self {
        Self {
            table: ExchangeRateTable::fallback(),
            origin: RateOrigin::Fallback,
            updated_at: None,
        }
    }

    pub fn live(table: ExchangeRateTable, updated_at: DateTime<Utc>) -> Self {
        Self {
            table,
            origin: RateOrigin::Live,
            updated_at: Some(updated_at),
        }
    }
}

impl Default for RateSnapshot {
    fn default() -> Self {
        Self::initial()
    }
}
