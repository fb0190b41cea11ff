//! Output module for run summaries and store reports
//!
//! This module handles:
//! - The end-of-run statistics summary
//! - Reading statistics back from the job store

pub mod stats;
mod summary;

pub use stats::{format_statistics, load_statistics, print_statistics, StoreStatistics};
pub use summary::{format_summary, print_summary};
