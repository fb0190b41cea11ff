//! Crawl frontier
//!
//! Walks the search results pages in order and turns every new job link into a
//! detail fetch. Detail fetches run in parallel up to `detail-concurrency`;
//! each parsed [`Job`] is handed to the worker pool over a channel.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::crawler::parser::{extract_job_links, parse_job_detail, JobLink};
use crate::model::{Job, JobStats};
use crate::state::DedupCache;
use crate::url::build_search_url;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// What a finished crawl did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrontierSummary {
    /// Results pages fetched successfully
    pub pages_fetched: u32,
    /// Detail fetches started for new job IDs
    pub details_queued: u64,
}

/// Producer side of the pipeline
///
/// A `Frontier` runs once: [`Frontier::run`] consumes it.
pub struct Frontier {
    config: CrawlerConfig,
    client: Client,
    cache: Arc<DedupCache>,
    stats: Arc<JobStats>,
}

impl Frontier {
    pub fn new(
        config: CrawlerConfig,
        client: Client,
        cache: Arc<DedupCache>,
        stats: Arc<JobStats>,
    ) -> Self {
        Self {
            config,
            client,
            cache,
            stats,
        }
    }

    /// Crawls up to `max-pages` results pages and emits parsed jobs on `jobs`
    ///
    /// Returns once every queued detail fetch has finished. The sender is
    /// dropped on return, which closes the channel for the receiver.
    ///
    /// A failed results page stops pagination; detail fetches already queued
    /// still complete. A failed detail page is logged and skipped.
    pub async fn run(self, jobs: mpsc::Sender<Job>, cancel: CancellationToken) -> FrontierSummary {
        let mut summary = FrontierSummary::default();
        let detail_slots = Arc::new(Semaphore::new(self.config.detail_concurrency as usize));
        let mut details = JoinSet::new();
        let delay = self.config.request_delay();

        for page in 1..=self.config.max_pages {
            if cancel.is_cancelled() {
                tracing::info!("Crawl cancelled before results page {}", page);
                break;
            }

            let page_url =
                match build_search_url(&self.config.base_url, &self.config.query, page) {
                    Ok(url) => url,
                    Err(e) => {
                        tracing::error!("Cannot build URL for results page {}: {}", page, e);
                        break;
                    }
                };

            tracing::debug!("Fetching results page {}: {}", page, page_url);

            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Crawl cancelled while fetching results page {}", page);
                    break;
                }
                result = fetch_url(&self.client, page_url.as_str()) => result,
            };

            let (final_url, body) = match result {
                FetchResult::Success {
                    final_url, body, ..
                } => (final_url, body),
                other => {
                    tracing::warn!("Results page {} failed ({}), stopping pagination", page, other);
                    break;
                }
            };
            summary.pages_fetched += 1;

            let base = Url::parse(&final_url).unwrap_or(page_url);
            let links = extract_job_links(&body, &base);
            tracing::debug!("Results page {} has {} job links", page, links.len());

            for link in links {
                self.stats.record_discovered();

                if self.cache.check_and_insert(&link.job_id) {
                    self.stats.record_skipped();
                    tracing::debug!("Skipping already seen job {}", link.job_id);
                    continue;
                }

                summary.details_queued += 1;
                details.spawn(fetch_detail(
                    self.client.clone(),
                    link,
                    Arc::clone(&detail_slots),
                    jobs.clone(),
                    cancel.clone(),
                ));
            }

            if page < self.config.max_pages && !delay.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        while let Some(joined) = details.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Detail fetch task failed: {}", e);
            }
        }

        tracing::info!(
            "Crawl finished: {} results pages, {} detail pages queued",
            summary.pages_fetched,
            summary.details_queued
        );

        summary
    }
}

/// Fetches one detail page, parses it and hands the job downstream
///
/// The slot is held until the job has been handed off, so at most
/// `detail-concurrency` parsed jobs wait on a busy pool.
async fn fetch_detail(
    client: Client,
    link: JobLink,
    slots: Arc<Semaphore>,
    jobs: mpsc::Sender<Job>,
    cancel: CancellationToken,
) {
    let _permit = tokio::select! {
        _ = cancel.cancelled() => return,
        permit = slots.acquire_owned() => match permit {
            Ok(permit) => permit,
            Err(_) => return,
        },
    };

    let result = tokio::select! {
        _ = cancel.cancelled() => return,
        result = fetch_url(&client, &link.url) => result,
    };

    let (final_url, body) = match result {
        FetchResult::Success {
            final_url, body, ..
        } => (final_url, body),
        other => {
            tracing::warn!("Detail page for job {} failed: {}", link.job_id, other);
            return;
        }
    };

    let job = parse_job_detail(&body, &link.job_id, &final_url);
    tracing::debug!("Parsed job {}: {}", job.job_id, job.title);

    tokio::select! {
        _ = cancel.cancelled() => {}
        sent = jobs.send(job) => {
            if sent.is_err() {
                tracing::debug!("Job {} dropped, receiver closed", link.job_id);
            }
        }
    }
}
