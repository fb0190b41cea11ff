use crate::config::EnrichmentConfig;
use rand::Rng;
use std::time::Duration;

/// Exponential backoff with full jitter
///
/// Attempt `i` (0-based) waits a uniformly random duration in
/// `[0, min(base * 2^i, max))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub base: Duration,
    pub max: Duration,
    pub max_attempts: u32,
}

impl BackoffPolicy {
    pub fn from_config(config: &EnrichmentConfig) -> Self {
        Self {
            base: Duration::from_millis(config.base_delay_ms),
            max: Duration::from_millis(config.max_delay_ms),
            max_attempts: config.max_attempts,
        }
    }

    /// Upper bound of the wait after attempt `attempt`
    pub fn cap_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base
            .checked_mul(factor)
            .map_or(self.max, |grown| grown.min(self.max))
    }

    /// Draws the wait after attempt `attempt`
    pub fn delay_for<R: Rng + ?Sized>(&self, attempt: u32, rng: &mut R) -> Duration {
        let cap = u64::try_from(self.cap_for(attempt).as_nanos()).unwrap_or(u64::MAX);
        if cap == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(rng.random_range(0..cap))
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(500),
            max: Duration::from_secs(10),
            max_attempts: 10,
        }
    }
}
