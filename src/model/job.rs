use crate::enrichment::JobEnrichment;
use serde::{Deserialize, Serialize};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_COMPANY: &str = "Unknown Company";
pub const UNKNOWN_LOCATION: &str = "Unknown Location";
pub const NO_DESCRIPTION: &str = "No description available";
pub const SALARY_NOT_SPECIFIED: &str = "Not specified";
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// One job listing
///
/// A `Job` leaves the crawler with every scraped field populated (falling back
/// to the literals above) and the enrichment fields empty. Enrichment never
/// mutates a listing in place; [`Job::with_enrichment`] and
/// [`Job::with_mock_enrichment`] return a new copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Numeric identifier taken from the detail URL
    pub job_id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modality: Option<String>,
    pub posted_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_date: Option<String>,
    pub salary: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_years_experience: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub is_software_engineer_related: bool,
}

impl Job {
    /// Returns an enriched copy carrying the classifier's fields
    pub fn with_enrichment(&self, enrichment: &JobEnrichment) -> Job {
        let mut job = self.clone();

        job.parsed_description = Some(enrichment.parsed_description.clone());
        job.min_degree = Some(enrichment.min_degree.as_str().to_string());
        job.min_years_experience = Some(enrichment.min_years_experience);
        job.modality = Some(enrichment.modality.as_str().to_string());
        job.domain = Some(enrichment.domain.as_str().to_string());
        job.languages = enrichment.languages.clone();
        job.technologies = enrichment.technologies.clone();
        job.is_software_engineer_related = enrichment.is_software_engineer_related;

        let deadline = enrichment.deadline_date.trim();
        if !deadline.is_empty() {
            job.expires_date = Some(deadline.to_string());
        }

        job
    }

    /// Returns a copy filled with the fixed values used in dry-run mode
    pub fn with_mock_enrichment(&self) -> Job {
        let mut job = self.clone();

        job.parsed_description = Some(format!("Mock parsed description for {}", self.title));
        job.min_degree = Some("Bachelor's".to_string());
        job.min_years_experience = Some(3);
        job.modality = Some("Remote".to_string());
        job.domain = Some("Software Development".to_string());
        job.languages = vec!["Go".to_string(), "Python".to_string()];
        job.technologies = vec!["Docker".to_string(), "Kubernetes".to_string()];

        job
    }
}
