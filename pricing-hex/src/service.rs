//! Pricing Application Service
//!
//! Owns the last-known-good caches (exchange rates and per-client location
//! profiles) and feeds them into the pure pricing rules.
//! Contains NO transport logic - the feeds are injected through the ports.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, info, instrument, warn};

use pricing_types::{
    AppError, BASE_COUNTRY, BASE_CURRENCY, CurrencyCode, ExchangeRateTable, FeedError,
    GeolocationProvider, LocationProfile, PlanPrice, PlansResponse, PricingPlan, QuoteRequest,
    QuoteResponse, RateSnapshot, RateSource, Refresh, Timeline, get_timeline_adjusted_price,
    merge_or_keep, quote_price,
};

/// Tunables for the pricing service.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Countries that never pay the international markup.
    pub exempt_countries: Vec<String>,
    /// How long a successful geolocation lookup is reused for the same IP.
    pub location_ttl: Duration,
    /// Most IPs held in the location cache. When full, expired entries are
    /// swept; if none have expired, new lookups are served but not cached.
    pub location_cache_capacity: usize,
    /// Plans offered on the pricing pages.
    pub catalog: Vec<PricingPlan>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            exempt_countries: vec![BASE_COUNTRY.to_string()],
            location_ttl: Duration::from_secs(30 * 60),
            location_cache_capacity: 10_000,
            catalog: PricingPlan::default_catalog(),
        }
    }
}

struct CachedLocation {
    profile: LocationProfile,
    resolved_at: Instant,
}

/// Application service for price quotes.
///
/// Generic over the two feed ports so tests can inject in-memory providers.
pub struct PricingService<G: GeolocationProvider, S: RateSource> {
    geolocation: G,
    rate_source: S,
    rates: ArcSwap<RateSnapshot>,
    locations: DashMap<IpAddr, CachedLocation>,
    settings: ServiceSettings,
}

impl<G: GeolocationProvider, S: RateSource> PricingService<G, S> {
    /// Creates a service with default settings and the static fallback rates.
    pub fn new(geolocation: G, rate_source: S) -> Self {
        Self::with_settings(geolocation, rate_source, ServiceSettings::default())
    }

    pub fn with_settings(geolocation: G, rate_source: S, settings: ServiceSettings) -> Self {
        Self {
            geolocation,
            rate_source,
            rates: ArcSwap::from_pointee(RateSnapshot::initial()),
            locations: DashMap::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    #[cfg(test)]
    pub(crate) fn geolocation(&self) -> &G {
        &self.geolocation
    }

    #[cfg(test)]
    pub(crate) fn cached_locations(&self) -> usize {
        self.locations.len()
    }

    /// Current rate cache.
    pub fn rates(&self) -> Arc<RateSnapshot> {
        self.rates.load_full()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Location
    // ─────────────────────────────────────────────────────────────────────────────

    /// Resolves the caller's location profile. Never fails.
    ///
    /// Lookup failures yield the base profile and are not cached, so the next
    /// request from the same address tries again. Without a client address
    /// there is nothing to look up and the base profile is returned as is.
    #[instrument(skip(self))]
    pub async fn resolve_location(&self, ip: Option<IpAddr>) -> LocationProfile {
        let Some(ip) = ip else {
            debug!("No client address, using base profile");
            return LocationProfile::base();
        };

        if let Some(profile) = self.cached_location(ip) {
            debug!(country = %profile.country_code, "Location cache hit");
            return profile;
        }

        let lookup = self.geolocation.lookup(Some(ip)).await;
        let outcome = merge_or_keep(&LocationProfile::base(), lookup, |_, geo| {
            LocationProfile::from_geo(&geo, &self.settings.exempt_countries)
        });

        match &outcome {
            Refresh::Merged(profile) => self.remember_location(ip, profile.clone()),
            Refresh::Kept { error, .. } => {
                warn!(%error, "Location lookup failed, using base profile");
            }
        }

        outcome.into_value()
    }

    fn cached_location(&self, ip: IpAddr) -> Option<LocationProfile> {
        let entry = self.locations.get(&ip)?;
        if entry.resolved_at.elapsed() < self.settings.location_ttl {
            Some(entry.profile.clone())
        } else {
            None
        }
    }

    fn remember_location(&self, ip: IpAddr, profile: LocationProfile) {
        let capacity = self.settings.location_cache_capacity;
        if self.locations.len() >= capacity && !self.locations.contains_key(&ip) {
            let ttl = self.settings.location_ttl;
            self.locations.retain(|_, c| c.resolved_at.elapsed() < ttl);
            if self.locations.len() >= capacity {
                debug!(capacity, "Location cache full, not caching");
                return;
            }
        }
        self.locations.insert(
            ip,
            CachedLocation {
                profile,
                resolved_at: Instant::now(),
            },
        );
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Exchange Rates
    // ─────────────────────────────────────────────────────────────────────────────

    /// Fetches live rates and replaces the cached table on success.
    ///
    /// Returns the table now in effect: the merged one, or the previous one
    /// if the fetch failed.
    pub async fn refresh_exchange_rates(&self) -> ExchangeRateTable {
        self.refresh().await.into_value().table
    }

    /// Like [`Self::refresh_exchange_rates`], but reports the failure.
    /// The cache is left untouched on error either way.
    pub async fn try_refresh_exchange_rates(&self) -> Result<ExchangeRateTable, FeedError> {
        self.refresh().await.into_result().map(|s| s.table)
    }

    #[instrument(skip(self))]
    async fn refresh(&self) -> Refresh<RateSnapshot, FeedError> {
        let fetched = self.rate_source.latest_rates(BASE_CURRENCY).await;
        let previous = self.rates.load_full();

        let outcome = merge_or_keep(previous.as_ref(), fetched, |prev, live| {
            RateSnapshot::live(prev.table.merged_with(live), Utc::now())
        });

        match &outcome {
            Refresh::Merged(snapshot) => {
                self.rates.store(Arc::new(snapshot.clone()));
                info!(
                    usd = snapshot.table.rate(CurrencyCode::USD),
                    "Exchange rates refreshed"
                );
            }
            Refresh::Kept { error, .. } => {
                warn!(%error, "Rate refresh failed, keeping previous rates");
            }
        }

        outcome
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Quotes
    // ─────────────────────────────────────────────────────────────────────────────

    /// Prices an arbitrary PKR amount for a caller at `location`.
    pub fn quote(
        &self,
        req: &QuoteRequest,
        location: &LocationProfile,
    ) -> Result<QuoteResponse, AppError> {
        if !req.base_price.is_finite() || req.base_price < 0.0 {
            return Err(AppError::BadRequest(
                "Base price must be a non-negative number".into(),
            ));
        }

        let plan = match req.plan_title.as_deref() {
            Some(title) => Some(self.find_plan(title)?),
            None => None,
        };

        let currency = req.currency.unwrap_or(location.currency);
        let exchange_rate = self.rates.load().table.rate(currency);
        let adjusted = get_timeline_adjusted_price(req.base_price, req.timeline.multiplier());
        let quote = quote_price(
            adjusted,
            currency,
            exchange_rate,
            location.is_exempt_country,
            plan,
        );

        Ok(QuoteResponse {
            display: quote.display(),
            currency,
            amount: quote.money().map(|m| m.amount()),
            exchange_rate,
            markup_applied: quote.markup_applied(),
            coming_soon: quote.money().is_none(),
            timeline: req.timeline,
            location: location.clone(),
        })
    }

    /// Prices every catalog plan for a caller at `location`.
    pub fn priced_catalog(
        &self,
        location: &LocationProfile,
        currency: Option<CurrencyCode>,
        timeline: Timeline,
    ) -> PlansResponse {
        let currency = currency.unwrap_or(location.currency);
        let snapshot = self.rates.load();
        let exchange_rate = snapshot.table.rate(currency);

        let plans = self
            .settings
            .catalog
            .iter()
            .map(|plan| {
                let adjusted =
                    get_timeline_adjusted_price(plan.base_price as f64, timeline.multiplier());
                let quote = quote_price(
                    adjusted,
                    currency,
                    exchange_rate,
                    location.is_exempt_country,
                    Some(plan),
                );
                PlanPrice {
                    title: plan.title.clone(),
                    description: plan.description.clone(),
                    base_price: plan.base_price,
                    display: quote.display(),
                    amount: quote.money().map(|m| m.amount()),
                    coming_soon: plan.coming_soon,
                }
            })
            .collect();

        PlansResponse {
            currency,
            timeline,
            markup_applied: !currency.is_base() && !location.is_exempt_country,
            location: location.clone(),
            plans,
        }
    }

    fn find_plan(&self, title: &str) -> Result<&PricingPlan, AppError> {
        self.settings
            .catalog
            .iter()
            .find(|p| p.title.eq_ignore_ascii_case(title.trim()))
            .ok_or_else(|| AppError::NotFound(format!("Plan {}", title)))
    }
}
