//! Core data types shared across the pipeline
//!
//! - [`Job`]: one listing, as scraped and as enriched
//! - [`JobStats`]: lock-free counters updated by many tasks
//! - [`StatsSnapshot`]: a frozen copy of those counters for reporting

mod job;
mod stats;

pub use job::{
    Job, NO_DESCRIPTION, SALARY_NOT_SPECIFIED, UNKNOWN_COMPANY, UNKNOWN_DATE, UNKNOWN_LOCATION,
    UNKNOWN_TITLE,
};
pub use stats::{JobStats, StatsSnapshot};
