use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Job-Sieve
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    pub output: OutputConfig,
}

/// Crawl target and politeness configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Search query submitted to the results page
    #[serde(default = "default_query")]
    pub query: String,

    /// Root of the job site; the search path is resolved against it
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Number of result pages to walk before stopping
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Delay between two result-page fetches (milliseconds)
    #[serde(rename = "request-delay-ms", default)]
    pub request_delay_ms: u64,

    /// Maximum number of detail pages fetched at the same time
    #[serde(rename = "detail-concurrency", default = "default_detail_concurrency")]
    pub detail_concurrency: u32,

    /// User agent sent with every page request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl CrawlerConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            query: default_query(),
            base_url: default_base_url(),
            max_pages: default_max_pages(),
            request_delay_ms: 0,
            detail_concurrency: default_detail_concurrency(),
            user_agent: default_user_agent(),
        }
    }
}

/// Classifier endpoint and worker pool configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentConfig {
    /// Model name sent with each classification request
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the chat-completions API
    #[serde(rename = "api-base-url", default = "default_api_base_url")]
    pub api_base_url: String,

    /// Environment variable holding the API key
    #[serde(rename = "api-key-env", default = "default_api_key_env")]
    pub api_key_env: String,

    /// Maximum number of enrichment calls in flight
    #[serde(rename = "max-concurrency", default = "default_max_concurrency")]
    pub max_concurrency: u32,

    /// Simulate enrichment with fixed values and skip persistence
    #[serde(rename = "dry-run", default)]
    pub dry_run: bool,

    /// Attempts made while the classifier keeps answering 429
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// First backoff cap (milliseconds), doubled on every attempt
    #[serde(rename = "base-delay-ms", default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound for any backoff cap (milliseconds)
    #[serde(rename = "max-delay-ms", default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base_url: default_api_base_url(),
            api_key_env: default_api_key_env(),
            max_concurrency: default_max_concurrency(),
            dry_run: false,
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Dedup cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Load the seen-ID set before crawling and persist it afterwards
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_query() -> String {
    "software developer".to_string()
}

fn default_base_url() -> String {
    "https://seeker.worksourcewa.com/".to_string()
}

fn default_max_pages() -> u32 {
    2
}

fn default_detail_concurrency() -> u32 {
    25
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36".to_string()
}

fn default_model() -> String {
    "gpt-4.1-nano".to_string()
}

fn default_api_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_max_concurrency() -> u32 {
    25
}

fn default_max_attempts() -> u32 {
    10
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_true() -> bool {
    true
}
