//! Configuration module for Job-Sieve
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use job_sieve::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("job-sieve.toml")).unwrap();
//! println!("Crawler will walk {} result pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CacheConfig, Config, CrawlerConfig, EnrichmentConfig, OutputConfig};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, parse_config, resolve_api_key,
};

pub use validation::validate;
