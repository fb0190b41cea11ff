use crate::config::EnrichmentConfig;
use crate::enrichment::backoff::BackoffPolicy;
use crate::enrichment::error::EnrichmentError;
use crate::enrichment::schema::{enrichment_schema, JobEnrichment};
use crate::enrichment::types::{ChatRequest, ChatResponse};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Classification client with 429 backoff
///
/// Only HTTP 429 is retried. Any other failure, including a body that does not
/// match the schema, ends the call on the attempt that produced it.
#[derive(Debug, Clone)]
pub struct EnrichmentClient {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
    backoff: BackoffPolicy,
    schema: Value,
}

impl EnrichmentClient {
    pub fn new(config: &EnrichmentConfig, api_key: impl Into<String>) -> Result<Self, EnrichmentError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", config.api_base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: config.model.clone(),
            backoff: BackoffPolicy::from_config(config),
            schema: enrichment_schema(),
        })
    }

    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Classifies one job from its title and description
    pub async fn enrich(
        &self,
        title: &str,
        description: &str,
    ) -> Result<JobEnrichment, EnrichmentError> {
        let request = ChatRequest::structured(
            self.model.as_str(),
            format!("{}\n{}", title, description),
            self.schema.clone(),
        );
        let attempts = self.backoff.max_attempts.max(1);

        for attempt in 0..attempts {
            match self.send(&request).await {
                Err(e) if e.is_rate_limited() => {
                    if attempt + 1 == attempts {
                        break;
                    }
                    let delay = self.backoff.delay_for(attempt, &mut rand::rng());
                    tracing::warn!(
                        "Rate limited, waiting {} ms before retry {}/{}",
                        delay.as_millis(),
                        attempt + 1,
                        attempts
                    );
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }

        Err(EnrichmentError::RateLimited { attempts })
    }

    async fn send(&self, request: &ChatRequest) -> Result<JobEnrichment, EnrichmentError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichmentError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(EnrichmentError::EmptyResponse)?;

        parse_enrichment(&content)
    }
}

/// Parses the message content returned by the classifier
pub fn parse_enrichment(content: &str) -> Result<JobEnrichment, EnrichmentError> {
    let enrichment: JobEnrichment =
        serde_json::from_str(content).map_err(|e| EnrichmentError::Parse(e.to_string()))?;
    enrichment.validate().map_err(EnrichmentError::Parse)?;
    Ok(enrichment)
}
