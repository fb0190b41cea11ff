use crate::config::{resolve_api_key, Config};
use crate::crawler::{build_http_client, Frontier};
use crate::enrichment::{Enricher, EnrichmentClient};
use crate::model::{JobStats, StatsSnapshot};
use crate::pipeline::workers::WorkerPool;
use crate::state::DedupCache;
use crate::storage::JobStore;
use crate::Result;
use reqwest::Client;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Outcome of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub execution_time: Duration,
    pub stats: StatsSnapshot,
    pub pages_fetched: u32,
    pub cache_enabled: bool,
    pub cache_initial_size: usize,
    pub cache_final_size: usize,
    pub jobs_added_to_cache: usize,
    pub cancelled: bool,
}

/// Wires the frontier to the worker pool for one run
pub struct Pipeline {
    config: Config,
    http: Client,
    enricher: Arc<dyn Enricher>,
    store: Arc<dyn JobStore>,
}

impl Pipeline {
    pub fn new(
        config: Config,
        http: Client,
        enricher: Arc<dyn Enricher>,
        store: Arc<dyn JobStore>,
    ) -> Self {
        Self {
            config,
            http,
            enricher,
            store,
        }
    }

    /// Builds the HTTP client and the classification client from `config`
    ///
    /// Fails if the API key is missing outside dry-run.
    pub fn from_config(config: Config, store: Arc<dyn JobStore>) -> Result<Self> {
        let api_key = resolve_api_key(&config.enrichment)?;
        let http = build_http_client(&config.crawler)?;
        let enricher = EnrichmentClient::new(&config.enrichment, api_key.unwrap_or_default())?;

        Ok(Self::new(config, http, Arc::new(enricher), store))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the crawl and enrichment to completion
    ///
    /// The call returns once the frontier has closed the channel and every
    /// worker has finished. A failure to load the dedup cache aborts before any
    /// request is made; a failure to persist it afterwards is logged and the
    /// report is still returned. A cancelled run does not persist the cache.
    pub async fn run(&self, cancel: CancellationToken) -> Result<RunReport> {
        let start = Instant::now();
        let cache_enabled = self.config.cache.enabled;

        let initial_ids = if cache_enabled {
            let ids = self.store.load_id_set().await?;
            tracing::info!("Job ID cache contains {} entries before crawling", ids.len());
            ids
        } else {
            tracing::info!("Job ID cache disabled for this run");
            HashSet::new()
        };

        let cache = Arc::new(DedupCache::new(initial_ids));
        let stats = Arc::new(JobStats::new());
        let (tx, rx) = mpsc::channel(1);

        let frontier = Frontier::new(
            self.config.crawler.clone(),
            self.http.clone(),
            Arc::clone(&cache),
            Arc::clone(&stats),
        );
        let pool = WorkerPool::new(
            Arc::clone(&self.enricher),
            Arc::clone(&self.store),
            Arc::clone(&stats),
            self.config.enrichment.max_concurrency as usize,
            self.config.enrichment.dry_run,
        );

        tracing::info!(
            "Starting job crawl for '{}' with max pages set to {}",
            self.config.crawler.query,
            self.config.crawler.max_pages
        );

        let (summary, ()) = tokio::join!(
            frontier.run(tx, cancel.clone()),
            pool.run(rx, cancel.clone())
        );

        let cancelled = cancel.is_cancelled();
        let (cache_initial_size, cache_final_size, jobs_added_to_cache) = if cache_enabled {
            (cache.initial_size(), cache.len(), cache.jobs_added())
        } else {
            (0, 0, 0)
        };

        if cache_enabled {
            if cancelled {
                tracing::warn!("Run cancelled, job ID cache not persisted");
            } else {
                match self.store.persist_id_set(&cache.snapshot()).await {
                    Ok(()) => tracing::info!(
                        "Jobs added to cache: {} ({} entries total)",
                        jobs_added_to_cache,
                        cache_final_size
                    ),
                    Err(e) => tracing::error!("Failed to persist job ID cache: {}", e),
                }
            }
        }

        Ok(RunReport {
            execution_time: start.elapsed(),
            stats: stats.snapshot(),
            pages_fetched: summary.pages_fetched,
            cache_enabled,
            cache_initial_size,
            cache_final_size,
            jobs_added_to_cache,
            cancelled,
        })
    }
}
