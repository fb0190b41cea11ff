use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Live job counters shared by the crawler and the worker pool
///
/// Each counter is an independent atomic; no lock spans two counters. Read
/// them through [`JobStats::snapshot`] and compute ratios from the snapshot,
/// never from the live fields.
#[derive(Debug, Default)]
pub struct JobStats {
    total: AtomicU64,
    processed: AtomicU64,
    skipped: AtomicU64,
    unrelated: AtomicU64,
    successful: AtomicU64,
    failed: AtomicU64,
}

impl JobStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// A job link was seen on a results page
    pub fn record_discovered(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    /// A job link was dropped because its ID was already known
    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// A worker picked the job up
    pub fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unrelated(&self) {
        self.unrelated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_successful(&self) {
        self.successful.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies every counter into a plain value
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total: self.total.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            unrelated: self.unrelated.load(Ordering::Relaxed),
            successful: self.successful.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`JobStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub total: u64,
    pub processed: u64,
    pub skipped: u64,
    pub unrelated: u64,
    pub successful: u64,
    pub failed: u64,
}

impl StatsSnapshot {
    /// Share of discovered jobs that were enriched successfully, in percent
    pub fn success_rate(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(self.successful as f64 / self.total as f64 * 100.0)
    }

    /// Processed jobs per second over the given wall-clock time
    pub fn jobs_per_second(&self, elapsed: Duration) -> Option<f64> {
        let secs = elapsed.as_secs_f64();
        if secs <= 0.0 {
            return None;
        }
        Some(self.processed as f64 / secs)
    }
}
