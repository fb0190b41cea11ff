use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Set of job IDs already seen, from earlier runs plus this one
///
/// The cache only grows during a run. [`DedupCache::check_and_insert`] holds
/// the lock across the lookup and the insert, so two links carrying the same ID
/// can never both be queued, however many tasks race on them.
#[derive(Debug)]
pub struct DedupCache {
    seen: Mutex<HashSet<String>>,
    initial_size: usize,
}

impl DedupCache {
    /// Creates a cache seeded with the IDs loaded from storage
    pub fn new(initial: HashSet<String>) -> Self {
        let initial_size = initial.len();
        Self {
            seen: Mutex::new(initial),
            initial_size,
        }
    }

    /// Creates a cache with no history
    pub fn empty() -> Self {
        Self::new(HashSet::new())
    }

    /// Records `job_id` as seen
    ///
    /// Returns `true` if the ID was already present, in which case nothing changes.
    pub fn check_and_insert(&self, job_id: &str) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        if seen.contains(job_id) {
            return true;
        }
        seen.insert(job_id.to_string());
        false
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of IDs the cache was created with
    pub fn initial_size(&self) -> usize {
        self.initial_size
    }

    /// Copies the current ID set out of the cache
    pub fn snapshot(&self) -> HashSet<String> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// IDs added since the cache was created
    pub fn jobs_added(&self) -> usize {
        self.len().saturating_sub(self.initial_size)
    }
}

impl Default for DedupCache {
    fn default() -> Self {
        Self::empty()
    }
}
