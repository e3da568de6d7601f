//! Background exchange rate refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

use pricing_types::{GeolocationProvider, RateSource};

use crate::PricingService;

/// When to refresh rates.
///
/// Successful refreshes wait the full `interval`. After a failure the next
/// attempt comes after `initial_backoff`, doubling per consecutive failure
/// and never exceeding `interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSchedule {
    pub interval: Duration,
    pub initial_backoff: Duration,
}

impl Default for RefreshSchedule {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60 * 60),
            initial_backoff: Duration::from_secs(30),
        }
    }
}

impl RefreshSchedule {
    pub fn delay_after(&self, consecutive_failures: u32) -> Duration {
        if consecutive_failures == 0 {
            return self.interval;
        }
        let factor = 2u32.saturating_pow(consecutive_failures - 1);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.interval)
    }
}

/// Refreshes the service's rate cache once immediately, then on schedule.
pub struct RateRefresher<G: GeolocationProvider, S: RateSource> {
    service: Arc<PricingService<G, S>>,
    schedule: RefreshSchedule,
}

impl<G: GeolocationProvider, S: RateSource> RateRefresher<G, S> {
    pub fn new(service: Arc<PricingService<G, S>>, schedule: RefreshSchedule) -> Self {
        Self { service, schedule }
    }

    /// Runs the refresh loop on the tokio runtime. Abort the handle to stop it.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    #[instrument(skip(self))]
    pub async fn run(self) {
        info!(
            interval_secs = self.schedule.interval.as_secs(),
            "Starting exchange rate refresher"
        );
        let mut failures: u32 = 0;
        loop {
            match self.service.try_refresh_exchange_rates().await {
                Ok(_) => failures = 0,
                Err(_) => failures = failures.saturating_add(1),
            }
            let delay = self.schedule.delay_after(failures);
            debug!(failures, delay_secs = delay.as_secs(), "Next rate refresh scheduled");
            sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> RefreshSchedule {
        RefreshSchedule {
            interval: Duration::from_secs(3600),
            initial_backoff: Duration::from_secs(30),
        }
    }

    #[test]
    fn test_success_waits_full_interval() {
        assert_eq!(schedule().delay_after(0), Duration::from_secs(3600));
    }

    #[test]
    fn test_backoff_doubles() {
        let s = schedule();
        assert_eq!(s.delay_after(1), Duration::from_secs(30));
        assert_eq!(s.delay_after(2), Duration::from_secs(60));
        assert_eq!(s.delay_after(3), Duration::from_secs(120));
        assert_eq!(s.delay_after(7), Duration::from_secs(1920));
    }

    #[test]
    fn test_backoff_capped_at_interval() {
        let s = schedule();
        assert_eq!(s.delay_after(8), Duration::from_secs(3600));
        assert_eq!(s.delay_after(40), Duration::from_secs(3600));
        assert_eq!(s.delay_after(u32::MAX), Duration::from_secs(3600));
    }
}
