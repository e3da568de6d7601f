//! Exchange rate source port.

use std::collections::HashMap;

use exchange_rates::CurrencyCode;

use crate::error::FeedError;

/// Port trait for live exchange rate providers.
#[async_trait::async_trait]
pub trait RateSource: Send + Sync + 'static {
    /// Fetches the latest rates pivoted on `base`.
    ///
    /// Returns units of each currency per one unit of `base`, keyed by the
    /// provider's currency codes. Codes outside the supported set are
    /// allowed here; filtering happens when the table is merged.
    async fn latest_rates(&self, base: CurrencyCode) -> Result<HashMap<String, f64>, FeedError>;
}
