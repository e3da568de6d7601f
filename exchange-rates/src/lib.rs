//! Supported Currencies and PKR-Pivoted Exchange Rate Tables
//!
//! Currencies are defined declaratively using a macro that generates the
//! `CurrencyCode` enum together with its metadata (ISO code, display symbol,
//! name and the static fallback rate used before any live rates arrive).
//!
//! Every rate is expressed as "units of the target currency per one PKR",
//! so converting a base-currency amount is a single multiplication.
//!
//! # Adding a New Currency
//! Add a line to the `define_currencies!` invocation:
//! ```ignore
//! define_currencies! {
//!     // ... existing currencies ...
//!     SAR => ("SAR", "﷼", "Saudi Riyal", 0.0134),
//! }
//! ```
//!
//! # Example
//! ```
//! use exchange_rates::{CurrencyCode, ExchangeRateTable, Money};
//!
//! let table = ExchangeRateTable::fallback();
//! assert_eq!(table.rate(CurrencyCode::PKR), 1.0);
//!
//! let usd = Money::from_rounded(38_500.0 * table.rate(CurrencyCode::USD), CurrencyCode::USD);
//! assert_eq!(usd.to_string(), "$ 139");
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// The currency every base price is denominated in.
pub const BASE_CURRENCY: CurrencyCode = CurrencyCode::PKR;

// ─────────────────────────────────────────────────────────────────────────────
// THE MACRO: Defines all currencies and the CurrencyCode enum
// ─────────────────────────────────────────────────────────────────────────────

/// Macro to define currencies with auto-generated metadata accessors.
///
/// # Syntax
/// ```ignore
/// define_currencies! {
///     Name => ("CODE", "SYMBOL", "Display name", fallback_rate_per_pkr),
/// }
/// ```
#[macro_export]
macro_rules! define_currencies {
    (
        $(
            $name:ident => ($code:literal, $symbol:literal, $display:literal, $fallback:expr)
        ),* $(,)?
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
        #[serde(rename_all = "UPPERCASE")]
        pub enum CurrencyCode {
            $($name),*
        }

        impl CurrencyCode {
            pub fn code(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $code),*
                }
            }

            pub fn symbol(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $symbol),*
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $display),*
                }
            }

            /// Static rate used until live rates have been fetched.
            pub fn fallback_rate(&self) -> f64 {
                match self {
                    $(CurrencyCode::$name => $fallback),*
                }
            }

            pub fn all() -> &'static [CurrencyCode] {
                &[$(CurrencyCode::$name),*]
            }
        }

        impl std::fmt::Display for CurrencyCode {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.code())
            }
        }

        impl std::str::FromStr for CurrencyCode {
            type Err = String;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_uppercase().as_str() {
                    $($code => Ok(CurrencyCode::$name),)*
                    _ => Err(format!("Unknown currency: {}", s)),
                }
            }
        }
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// CURRENCY DEFINITIONS - Add new currencies here!
// ─────────────────────────────────────────────────────────────────────────────

define_currencies! {
    PKR => ("PKR", "PKR", "Pakistani Rupee", 1.0),
    USD => ("USD", "$", "US Dollar", 0.0036),
    GBP => ("GBP", "£", "British Pound", 0.0028),
    AED => ("AED", "د.إ", "UAE Dirham", 0.013),
    EUR => ("EUR", "€", "Euro", 0.0033),
    AUD => ("AUD", "A$", "Australian Dollar", 0.0054),
    CAD => ("CAD", "C$", "Canadian Dollar", 0.0049),
}

impl CurrencyCode {
    pub fn is_base(&self) -> bool {
        *self == BASE_CURRENCY
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Money
// ─────────────────────────────────────────────────────────────────────────────

/// A whole-unit amount in one of the supported currencies.
///
/// The amount is unsigned, so a `Money` can never be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Money {
    amount: u64,
    currency: CurrencyCode,
}

impl Money {
    pub fn new(amount: u64, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Rounds a computed amount to the nearest whole unit (half away from zero).
    ///
    /// Negative and non-finite inputs collapse to zero.
    pub fn from_rounded(value: f64, currency: CurrencyCode) -> Self {
        let rounded = value.round();
        let amount = if rounded.is_finite() && rounded > 0.0 {
            rounded as u64
        } else {
            0
        };
        Self { amount, currency }
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn currency(&self) -> CurrencyCode {
        self.currency
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.currency.symbol(),
            format_grouped(self.amount)
        )
    }
}

/// Formats an amount with comma thousands separators (`1234567` → `1,234,567`).
pub fn format_grouped(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Exchange Rate Table
// ─────────────────────────────────────────────────────────────────────────────

/// Rates for every supported currency, pivoted on PKR.
///
/// Every supported currency always has an entry, PKR is always exactly `1.0`
/// and every rate is finite and positive. A table is never mutated in place:
/// merging live rates produces a new table.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRateTable {
    rates: HashMap<CurrencyCode, f64>,
}

impl ExchangeRateTable {
    /// The static table used at startup and whenever no live rates exist.
    pub fn fallback() -> Self {
        Self {
            rates: CurrencyCode::all()
                .iter()
                .map(|&c| (c, c.fallback_rate()))
                .collect(),
        }
    }

    /// Units of `currency` per one PKR.
    pub fn rate(&self, currency: CurrencyCode) -> f64 {
        if currency.is_base() {
            return 1.0;
        }
        self.rates
            .get(&currency)
            .copied()
            .unwrap_or_else(|| currency.fallback_rate())
    }

    /// Returns a new table with live rates laid over this one.
    ///
    /// Unsupported codes and rates that are not finite and positive are
    /// skipped; supported currencies missing from `live` keep their current
    /// rate. PKR stays pinned at `1.0`.
    pub fn merged_with<K, I>(&self, live: I) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, f64)>,
    {
        let mut rates = self.rates.clone();
        for (code, rate) in live {
            let Ok(currency) = code.as_ref().parse::<CurrencyCode>() else {
                continue;
            };
            if currency.is_base() || !rate.is_finite() || rate <= 0.0 {
                continue;
            }
            rates.insert(currency, rate);
        }
        rates.insert(BASE_CURRENCY, 1.0);
        Self { rates }
    }

    /// Converts a PKR amount into `currency` without rounding.
    pub fn convert_from_base(&self, amount: f64, currency: CurrencyCode) -> f64 {
        amount * self.rate(currency)
    }

    /// Iterates the table in `CurrencyCode::all()` order.
    pub fn iter(&self) -> impl Iterator<Item = (CurrencyCode, f64)> + '_ {
        CurrencyCode::all().iter().map(|&c| (c, self.rate(c)))
    }

    /// String-keyed view for serialization at API boundaries.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.iter().map(|(c, r)| (c.code().to_string(), r)).collect()
    }
}

impl Default for ExchangeRateTable {
    fn default() -> Self {
        Self::fallback()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
