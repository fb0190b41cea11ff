//! AI enrichment of scraped listings
//!
//! This module contains:
//! - The structured-output schema and its typed result
//! - The chat-completions client with rate-limit backoff
//! - The [`Enricher`] seam the worker pool calls through

mod backoff;
mod client;
mod error;
mod schema;
mod types;

pub use backoff::BackoffPolicy;
pub use client::{parse_enrichment, EnrichmentClient};
pub use error::EnrichmentError;
pub use schema::{enrichment_schema, Degree, JobEnrichment, Modality, TechDomain, MAX_YEARS_EXPERIENCE};

use crate::model::Job;
use async_trait::async_trait;

/// An enriched copy of a job plus whether classification counts as a success
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub job: Job,
    pub success: bool,
}

/// Classifies jobs
///
/// `None` means no enrichment could be produced at all; the caller counts it
/// as a failure and does not persist the job.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn classify(&self, job: &Job) -> Option<Classification>;
}

#[async_trait]
impl Enricher for EnrichmentClient {
    async fn classify(&self, job: &Job) -> Option<Classification> {
        match self.enrich(&job.title, &job.description).await {
            Ok(enrichment) => {
                if !enrichment.is_software_engineer_related {
                    tracing::debug!("Job {} classified as unrelated: {}", job.job_id, job.title);
                }
                Some(Classification {
                    job: job.with_enrichment(&enrichment),
                    success: true,
                })
            }
            Err(e) => {
                tracing::warn!("Classification failed for job {}: {}", job.job_id, e);
                None
            }
        }
    }
}
