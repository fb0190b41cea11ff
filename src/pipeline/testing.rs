//! Test doubles for the pipeline collaborators

use crate::enrichment::{Classification, Enricher};
use crate::model::Job;
use crate::storage::{JobStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn sample_job(id: &str) -> Job {
    Job {
        job_id: id.to_string(),
        title: format!("Engineer {}", id),
        company: "Acme Corp".to_string(),
        location: "Seattle, WA".to_string(),
        modality: None,
        posted_date: "2024-01-01".to_string(),
        expires_date: None,
        salary: "Not specified".to_string(),
        url: format!("https://example.com/jobdetail.aspx?JobID={}", id),
        min_years_experience: None,
        min_degree: None,
        domain: None,
        description: "Write software".to_string(),
        parsed_description: None,
        languages: Vec::new(),
        technologies: Vec::new(),
        is_software_engineer_related: false,
    }
}

#[derive(Debug, Clone, Copy)]
enum Script {
    Related,
    Unrelated,
    Partial,
    Fail,
}

/// Enricher returning a fixed outcome for every job
pub struct ScriptedEnricher {
    script: Script,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedEnricher {
    fn new(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn related() -> Self {
        Self::new(Script::Related)
    }

    pub fn unrelated() -> Self {
        Self::new(Script::Unrelated)
    }

    /// Returns an enriched job flagged as unsuccessful
    pub fn partial() -> Self {
        Self::new(Script::Partial)
    }

    pub fn failing() -> Self {
        Self::new(Script::Fail)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Enricher for ScriptedEnricher {
    async fn classify(&self, job: &Job) -> Option<Classification> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(5)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let mut enriched = job.with_mock_enrichment();
        match self.script {
            Script::Related => {
                enriched.is_software_engineer_related = true;
                Some(Classification {
                    job: enriched,
                    success: true,
                })
            }
            Script::Unrelated => Some(Classification {
                job: enriched,
                success: true,
            }),
            Script::Partial => {
                enriched.is_software_engineer_related = true;
                Some(Classification {
                    job: enriched,
                    success: false,
                })
            }
            Script::Fail => None,
        }
    }
}

/// In-memory store that records every call
#[derive(Default)]
pub struct RecordingStore {
    jobs: Mutex<Vec<Job>>,
    initial_ids: HashSet<String>,
    persisted: Mutex<Option<HashSet<String>>>,
    fail_persist: bool,
}

impl RecordingStore {
    pub fn with_ids(ids: &[&str]) -> Self {
        Self {
            initial_ids: ids.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn failing_persist() -> Self {
        Self {
            fail_persist: true,
            ..Self::default()
        }
    }

    pub fn stored(&self) -> Vec<Job> {
        self.jobs.lock().unwrap().clone()
    }

    pub fn persisted(&self) -> Option<HashSet<String>> {
        self.persisted.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobStore for RecordingStore {
    async fn put_job(&self, job: &Job) -> StorageResult<()> {
        self.jobs.lock().unwrap().push(job.clone());
        Ok(())
    }

    async fn load_id_set(&self) -> StorageResult<HashSet<String>> {
        Ok(self.initial_ids.clone())
    }

    async fn persist_id_set(&self, ids: &HashSet<String>) -> StorageResult<()> {
        if self.fail_persist {
            return Err(StorageError::Database("disk full".to_string()));
        }
        *self.persisted.lock().unwrap() = Some(ids.clone());
        Ok(())
    }
}

/// Store whose every operation fails
pub struct FailingStore;

#[async_trait]
impl JobStore for FailingStore {
    async fn put_job(&self, _job: &Job) -> StorageResult<()> {
        Err(StorageError::Database("connection lost".to_string()))
    }

    async fn load_id_set(&self) -> StorageResult<HashSet<String>> {
        Err(StorageError::Database("connection lost".to_string()))
    }

    async fn persist_id_set(&self, _ids: &HashSet<String>) -> StorageResult<()> {
        Err(StorageError::Database("connection lost".to_string()))
    }
}
