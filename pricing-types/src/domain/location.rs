//! Caller location as seen by the pricing rules.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use exchange_rates::{BASE_CURRENCY, CurrencyCode};

/// ISO 3166-1 alpha-2 code of the country base prices are set for.
pub const BASE_COUNTRY: &str = "PK";

/// Raw answer from a geolocation lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoLocation {
    pub country_code: String,
    /// Currency code as reported by the provider; may be unsupported.
    pub currency: Option<String>,
}

/// Where a caller is, which currency they see, and whether the
/// international markup applies to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LocationProfile {
    #[schema(example = "GB")]
    pub country_code: String,
    pub currency: CurrencyCode,
    /// Exempt countries never pay the international markup.
    pub is_exempt_country: bool,
}

impl LocationProfile {
    /// The profile used whenever a lookup fails: base country, base currency, exempt.
    pub fn base() -> Self {
        Self {
            country_code: BASE_COUNTRY.to_string(),
            currency: BASE_CURRENCY,
            is_exempt_country: true,
        }
    }

    /// Derives a profile from a lookup result.
    ///
    /// Currencies outside the supported set are shown in USD.
    pub fn from_geo(geo: &GeoLocation, exempt_countries: &[String]) -> Self {
        let country_code = geo.country_code.trim().to_uppercase();
        let currency = geo
            .currency
            .as_deref()
            .and_then(|c| c.parse::<CurrencyCode>().ok())
            .unwrap_or(CurrencyCode::USD);
        let is_exempt_country = exempt_countries
            .iter()
            .any(|c| c.eq_ignore_ascii_case(&country_code));

        Self {
            country_code,
            currency,
            is_exempt_country,
        }
    }
}

impl Default for LocationProfile {
    fn default() -> Self {
        Self::base()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exempt() -> Vec<String> {
        vec![BASE_COUNTRY.to_string()]
    }

    #[test]
    fn test_base_profile() {
        let profile = LocationProfile::default();
        assert_eq!(profile.country_code, "PK");
        assert_eq!(profile.currency, CurrencyCode::PKR);
        assert!(profile.is_exempt_country);
    }

    #[test]
    fn test_from_geo_supported_currency() {
        let geo = GeoLocation {
            country_code: "gb".into(),
            currency: Some("GBP".into()),
        };
        let profile = LocationProfile::from_geo(&geo, &exempt());
        assert_eq!(profile.country_code, "GB");
        assert_eq!(profile.currency, CurrencyCode::GBP);
        assert!(!profile.is_exempt_country);
    }

    #[test]
    fn test_from_geo_unsupported_currency_falls_back_to_usd() {
        let geo = GeoLocation {
            country_code: "JP".into(),
            currency: Some("JPY".into()),
        };
        let profile = LocationProfile::from_geo(&geo, &exempt());
        assert_eq!(profile.currency, CurrencyCode::USD);

        let geo = GeoLocation {
            country_code: "JP".into(),
            currency: None,
        };
        assert_eq!(
            LocationProfile::from_geo(&geo, &exempt()).currency,
            CurrencyCode::USD
        );
    }

    #[test]
    fn test_from_geo_exempt_country() {
        let geo = GeoLocation {
            country_code: "PK".into(),
            currency: Some("PKR".into()),
        };
        let profile = LocationProfile::from_geo(&geo, &exempt());
        assert_eq!(profile, LocationProfile::base());
    }

    #[test]
    fn test_from_geo_custom_exempt_list() {
        let geo = GeoLocation {
            country_code: "AE".into(),
            currency: Some("AED".into()),
        };
        let list = vec!["PK".to_string(), "ae".to_string()];
        let profile = LocationProfile::from_geo(&geo, &list);
        assert!(profile.is_exempt_country);
        assert_eq!(profile.currency, CurrencyCode::AED);
    }
}
