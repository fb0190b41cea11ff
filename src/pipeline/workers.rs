use crate::enrichment::Enricher;
use crate::model::{Job, JobStats};
use crate::storage::JobStore;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Consumer side of the pipeline
///
/// Spawns one task per received job. At most `max_concurrency` tasks run at
/// a time; the pool stops receiving while every slot is taken, which is what
/// stalls the frontier's hand-off.
#[derive(Clone)]
pub struct WorkerPool {
    enricher: Arc<dyn Enricher>,
    store: Arc<dyn JobStore>,
    stats: Arc<JobStats>,
    max_concurrency: usize,
    dry_run: bool,
}

impl WorkerPool {
    pub fn new(
        enricher: Arc<dyn Enricher>,
        store: Arc<dyn JobStore>,
        stats: Arc<JobStats>,
        max_concurrency: usize,
        dry_run: bool,
    ) -> Self {
        Self {
            enricher,
            store,
            stats,
            max_concurrency: max_concurrency.max(1),
            dry_run,
        }
    }

    /// Processes jobs until the channel closes, then waits for every worker
    ///
    /// Once `cancel` fires no new job is received. Every job already taken off
    /// the channel is processed to completion, so it lands in a counter.
    pub async fn run(&self, mut jobs: mpsc::Receiver<Job>, cancel: CancellationToken) {
        let slots = Arc::new(Semaphore::new(self.max_concurrency));
        let mut workers = JoinSet::new();

        loop {
            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                permit = Arc::clone(&slots).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let job = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                job = jobs.recv() => match job {
                    Some(job) => job,
                    None => break,
                },
            };

            let pool = self.clone();
            workers.spawn(async move {
                let _permit = permit;
                pool.process_job(job).await;
            });
        }

        if cancel.is_cancelled() {
            tracing::info!("Worker pool cancelled, waiting for running jobs");
        }
        jobs.close();

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Worker task failed: {}", e);
            }
        }
    }

    /// Enriches and stores one job, updating the counters
    ///
    /// Every call increments `processed`. Outside dry-run it also increments
    /// exactly one of `successful` or `failed`, plus `unrelated` for jobs the
    /// classifier marks as not software engineering. Only classified jobs are
    /// stored; storage errors are logged and the job is dropped.
    pub async fn process_job(&self, job: Job) {
        self.stats.record_processed();

        if self.dry_run {
            let mocked = job.with_mock_enrichment();
            let payload_size = serde_json::to_vec(&mocked).map(|b| b.len()).unwrap_or(0);
            tracing::debug!(
                "Dry run: mock enrichment for job {} ({}, {} bytes)",
                mocked.job_id,
                mocked.title,
                payload_size
            );
            return;
        }

        let Some(classification) = self.enricher.classify(&job).await else {
            self.stats.record_failed();
            return;
        };

        if classification.success {
            self.stats.record_successful();
        } else {
            self.stats.record_failed();
        }

        let enriched = classification.job;
        if !enriched.is_software_engineer_related {
            self.stats.record_unrelated();
        }

        match self.store.put_job(&enriched).await {
            Ok(()) => tracing::debug!("Stored job {}: {}", enriched.job_id, enriched.title),
            Err(e) => tracing::error!("Failed to store job {}: {}", enriched.job_id, e),
        }
    }
}
