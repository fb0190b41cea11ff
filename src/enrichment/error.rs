use thiserror::Error;

/// Errors from the classification endpoint
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// Connection failed, timed out, or the body could not be read
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Every attempt was answered with 429
    #[error("Rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },

    /// The response did not match the enrichment schema
    #[error("Parse error: {0}")]
    Parse(String),

    /// The response carried no choices or no message content
    #[error("Empty response from classifier")]
    EmptyResponse,

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl EnrichmentError {
    /// Whether the request should be retried after a backoff
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Api { status: 429, .. })
    }
}
