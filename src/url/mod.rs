//! URL handling module for Job-Sieve
//!
//! This module builds search result URLs and pulls job IDs out of
//! detail-page links.

mod job_id;
mod search;

pub use job_id::extract_job_id;
pub use search::build_search_url;
