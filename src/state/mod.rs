//! Run state shared between crawl tasks
//!
//! This module contains:
//! - The dedup cache of job IDs already seen

mod dedup;

pub use dedup::DedupCache;
