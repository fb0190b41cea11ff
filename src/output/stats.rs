//! Statistics read back from the job store
//!
//! Backs the `--stats` mode: what earlier runs left in the database.

use crate::storage::{SqliteStore, StorageResult};

/// Store statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct StoreStatistics {
    /// Jobs stored
    pub total_jobs: u64,

    /// Stored jobs classified as software engineering
    pub related_jobs: u64,

    /// IDs in the persisted dedup cache
    pub seen_ids: u64,

    /// Job counts per domain category, largest first
    pub jobs_by_domain: Vec<(String, u64)>,
}

/// Loads statistics from the store
pub fn load_statistics(store: &SqliteStore) -> StorageResult<StoreStatistics> {
    Ok(StoreStatistics {
        total_jobs: store.count_jobs()?,
        related_jobs: store.count_related_jobs()?,
        seen_ids: store.count_seen_ids()?,
        jobs_by_domain: store.jobs_by_domain()?,
    })
}

/// Renders statistics as the text printed by `--stats`
pub fn format_statistics(stats: &StoreStatistics) -> String {
    let mut out = String::from("=== Job Store Statistics ===\n\n");

    out.push_str(&format!("  Jobs stored: {}\n", stats.total_jobs));
    out.push_str(&format!("  Software engineering related: {}\n", stats.related_jobs));
    out.push_str(&format!(
        "  Unrelated: {}\n",
        stats.total_jobs.saturating_sub(stats.related_jobs)
    ));
    out.push_str(&format!("  Job IDs in dedup cache: {}\n", stats.seen_ids));

    if !stats.jobs_by_domain.is_empty() {
        out.push_str("\nJobs by Domain:\n");
        for (domain, count) in &stats.jobs_by_domain {
            let percentage = if stats.total_jobs > 0 {
                *count as f64 / stats.total_jobs as f64 * 100.0
            } else {
                0.0
            };
            out.push_str(&format!("  {}: {} ({:.1}%)\n", domain, count, percentage));
        }
    }

    out
}

pub fn print_statistics(stats: &StoreStatistics) {
    print!("{}", format_statistics(stats));
}
