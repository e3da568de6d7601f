//! Domain types and pricing rules.

pub mod fallback;
pub mod location;
pub mod plan;
pub mod pricing;
pub mod rates;

pub use fallback::{Refresh, merge_or_keep};
pub use location::{BASE_COUNTRY, GeoLocation, LocationProfile};
pub use plan::{PricingPlan, Timeline};
pub use pricing::{
    COMING_SOON, MARKUP_RATE, PriceQuote, compute_price, get_timeline_adjusted_price, quote_price,
};
pub use rates::{RateOrigin, RateSnapshot};
