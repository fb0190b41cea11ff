//! Crawler module for the job board
//!
//! This module contains the producer half of the pipeline:
//! - HTTP fetching with error classification
//! - Results page link extraction and detail page parsing
//! - The frontier that paginates, deduplicates and fans out detail fetches

mod fetcher;
mod frontier;
mod parser;

pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use frontier::{Frontier, FrontierSummary};
pub use parser::{extract_job_links, parse_job_detail, JobLink};
