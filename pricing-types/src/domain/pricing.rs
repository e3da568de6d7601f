//! The displayed-price computation.
//!
//! Everything here is pure: the caller supplies the exchange rate and the
//! exemption flag from whatever caches it holds.

use exchange_rates::{CurrencyCode, Money};

use super::plan::PricingPlan;

/// International surcharge for non-exempt callers paying in a non-base currency.
pub const MARKUP_RATE: f64 = 0.30;

/// Shown in place of a price for plans that are not on sale yet.
pub const COMING_SOON: &str = "SOON";

/// A computed price, before or after formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceQuote {
    ComingSoon,
    Priced { money: Money, markup_applied: bool },
}

impl PriceQuote {
    pub fn money(&self) -> Option<Money> {
        match self {
            PriceQuote::ComingSoon => None,
            PriceQuote::Priced { money, .. } => Some(*money),
        }
    }

    pub fn markup_applied(&self) -> bool {
        matches!(
            self,
            PriceQuote::Priced {
                markup_applied: true,
                ..
            }
        )
    }

    /// `"SOON"` or `"{symbol} {grouped amount}"`.
    pub fn display(&self) -> String {
        match self {
            PriceQuote::ComingSoon => COMING_SOON.to_string(),
            PriceQuote::Priced { money, .. } => money.to_string(),
        }
    }
}

/// Applies a timeline multiplier to a PKR base price.
pub fn get_timeline_adjusted_price(base_price: f64, timeline_multiplier: f64) -> f64 {
    base_price * timeline_multiplier
}

/// Computes the price to show for `base_price` (PKR) in `currency`.
///
/// Preconditions: `base_price >= 0` and `exchange_rate > 0`. Violations are
/// the caller's bug; the result is unspecified.
pub fn quote_price(
    base_price: f64,
    currency: CurrencyCode,
    exchange_rate: f64,
    is_exempt_country: bool,
    plan: Option<&PricingPlan>,
) -> PriceQuote {
    if plan.is_some_and(|p| p.coming_soon) {
        return PriceQuote::ComingSoon;
    }

    debug_assert!(base_price >= 0.0, "base price must be non-negative");

    if currency.is_base() {
        return PriceQuote::Priced {
            money: Money::from_rounded(base_price, currency),
            markup_applied: false,
        };
    }

    debug_assert!(exchange_rate > 0.0, "exchange rate must be positive");

    let mut converted = base_price * exchange_rate;
    let markup_applied = !is_exempt_country;
    if markup_applied {
        converted *= 1.0 + MARKUP_RATE;
    }

    PriceQuote::Priced {
        money: Money::from_rounded(converted, currency),
        markup_applied,
    }
}

/// Formatted form of [`quote_price`].
pub fn compute_price(
    base_price: f64,
    currency: CurrencyCode,
    exchange_rate: f64,
    is_exempt_country: bool,
    plan: Option<&PricingPlan>,
) -> String {
    quote_price(base_price, currency, exchange_rate, is_exempt_country, plan).display()
}
