//! Rate limiting middleware using Governor.
//!
//! Implements per-client-IP rate limiting with a token bucket algorithm.

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde_json::json;
use std::{
    num::NonZeroU32,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use super::client_ip::client_ip;

/// Default number of clients tracked individually.
pub const DEFAULT_MAX_CLIENTS: usize = 10_000;

/// Clients beyond the cap share this bucket.
const OVERFLOW_KEY: &str = "overflow";

/// Minimum time between idle sweeps while the map is full.
const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

struct ClientBucket {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    last_seen: Instant,
}

/// Rate limiter state shared across requests.
///
/// At most `max_clients` callers get their own bucket (plus the shared
/// overflow bucket). Buckets idle for longer than a full quota period are
/// indistinguishable from fresh ones and are swept when room is needed.
pub struct RateLimiterState {
    /// Per-client rate limiters
    limiters: DashMap<String, ClientBucket>,
    /// Quota for new clients
    quota: Quota,
    max_clients: usize,
    idle_after: Duration,
    last_sweep: Mutex<Option<Instant>>,
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::new(120)
    }
}

impl RateLimiterState {
    /// Creates a new rate limiter state allowing `requests_per_minute` per client,
    /// all of which may be spent in a burst. Zero is treated as one.
    pub fn new(requests_per_minute: u32) -> Self {
        Self::with_limits(
            requests_per_minute,
            DEFAULT_MAX_CLIENTS,
            Duration::from_secs(60),
        )
    }

    /// Like [`Self::new`] with an explicit client cap and idle period.
    pub fn with_limits(requests_per_minute: u32, max_clients: usize, idle_after: Duration) -> Self {
        let per_minute = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            limiters: DashMap::new(),
            quota: Quota::per_minute(per_minute),
            max_clients: max_clients.max(1),
            idle_after,
            last_sweep: Mutex::new(None),
        }
    }

    /// Checks if a request should be rate limited.
    /// Returns true if the request is allowed, false if rate limited.
    pub fn check(&self, key: &str) -> bool {
        let key = if self.limiters.contains_key(key) || self.has_room() {
            key
        } else {
            OVERFLOW_KEY
        };

        let mut bucket = self
            .limiters
            .entry(key.to_string())
            .or_insert_with(|| ClientBucket {
                limiter: RateLimiter::direct(self.quota),
                last_seen: Instant::now(),
            });
        bucket.last_seen = Instant::now();
        bucket.limiter.check().is_ok()
    }

    /// Number of buckets currently held.
    pub fn tracked_clients(&self) -> usize {
        self.limiters.len()
    }

    /// Drops buckets that have been idle for a full quota period.
    pub fn retain_recent(&self) {
        let idle_after = self.idle_after;
        self.limiters
            .retain(|_, bucket| bucket.last_seen.elapsed() < idle_after);
    }

    fn has_room(&self) -> bool {
        if self.limiters.len() < self.max_clients {
            return true;
        }
        if self.sweep_due() {
            self.retain_recent();
        }
        self.limiters.len() < self.max_clients
    }

    fn sweep_due(&self) -> bool {
        let Ok(mut last) = self.last_sweep.lock() else {
            return false;
        };
        let due = last.is_none_or(|at| at.elapsed() >= SWEEP_INTERVAL);
        if due {
            *last = Some(Instant::now());
        }
        due
    }
}

/// Rate limiting middleware keyed on the caller's IP.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Skip rate limiting for health endpoint
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let key = client_ip(request.headers(), request.extensions())
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if !limiter.check(&key) {
        tracing::warn!(client = %key, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Rate limit exceeded. Please try again later.",
                "retry_after_seconds": 60
            })),
        )
            .into_response();
    }

    next.run(request).await
}
