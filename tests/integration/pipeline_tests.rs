use async_trait::async_trait;
use job_sieve::config::{parse_config, Config};
use job_sieve::crawler::build_http_client;
use job_sieve::enrichment::{Classification, Enricher, EnrichmentClient};
use job_sieve::storage::{JobStore, SqliteStore};
use job_sieve::{Job, Pipeline, RunReport};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACME_DETAIL: &str = r#"
<html><body>
    <h1 class="margin-bottom">Senior Backend Engineer</h1>
    <h4><span class="capital-letter">Acme Corp</span> <small class="wrappable">Seattle, WA</small></h4>
    <p>Posted: 1/15/2024 - Expires: <strong>2/14/2024</strong></p>
    <p class="job-view-salary">$160,000 - $190,000</p>
    <span id="TrackingJobBody">Design and operate payment services in Rust.</span>
</body></html>
"#;

/// Enricher that marks every job as a related, successful classification
#[derive(Default)]
struct CountingEnricher {
    calls: AtomicUsize,
}

#[async_trait]
impl Enricher for CountingEnricher {
    async fn classify(&self, job: &Job) -> Option<Classification> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut enriched = job.with_mock_enrichment();
        enriched.is_software_engineer_related = true;
        Some(Classification {
            job: enriched,
            success: true,
        })
    }
}

fn results_page(ids: &[&str]) -> String {
    let mut html = String::from("<html><body>");
    for id in ids {
        html.push_str(&format!(
            r#"<h2 class="with-badge"><a href="/jobdetail.aspx?JobID={}">Listing {}</a></h2>"#,
            id, id
        ));
    }
    html.push_str("</body></html>");
    html
}

async fn mount_results(server: &MockServer, ids: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/jobsearch/powersearch.aspx"))
        .and(query_param("pg", "1"))
        .and(query_param("q", "rust developer"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(ids)))
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, id: &str, body: &str, expected_fetches: u64) {
    Mock::given(method("GET"))
        .and(path("/jobdetail.aspx"))
        .and(query_param("JobID", id))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .expect(expected_fetches)
        .mount(server)
        .await;
}

fn test_config(board: &MockServer, api_base: &str, dry_run: bool) -> Config {
    parse_config(&format!(
        r#"
        [crawler]
        query = "rust developer"
        base-url = "{}/"
        max-pages = 1
        detail-concurrency = 4

        [enrichment]
        api-base-url = "{}"
        max-concurrency = 2
        dry-run = {}
        base-delay-ms = 1
        max-delay-ms = 5

        [output]
        database-path = "unused.db"
        "#,
        board.uri(),
        api_base,
        dry_run
    ))
    .expect("test config is valid")
}

async fn run(config: Config, enricher: Arc<dyn Enricher>, store: Arc<dyn JobStore>) -> RunReport {
    let http = build_http_client(&config.crawler).unwrap();
    Pipeline::new(config, http, enricher, store)
        .run(CancellationToken::new())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_duplicate_links_yield_one_fetch_and_one_job() {
    let board = MockServer::start().await;
    mount_results(&board, &["123", "123", "456"]).await;
    mount_detail(&board, "123", ACME_DETAIL, 1).await;
    mount_detail(&board, "456", "<html><body><p>Nothing here</p></body></html>", 1).await;

    let store = Arc::new(SqliteStore::new_in_memory().unwrap());
    let enricher = Arc::new(CountingEnricher::default());
    let report = run(
        test_config(&board, "http://127.0.0.1:9", false),
        enricher.clone(),
        store.clone(),
    )
    .await;

    assert_eq!(report.stats.total, 3);
    assert_eq!(report.stats.skipped, 1);
    assert_eq!(report.stats.processed, 2);
    assert_eq!(report.stats.successful, 2);
    assert_eq!(report.stats.failed, 0);
    assert_eq!(enricher.calls.load(Ordering::SeqCst), 2);

    let acme = store.get_job("123").unwrap().expect("job 123 stored");
    assert_eq!(acme.title, "Senior Backend Engineer");
    assert_eq!(acme.company, "Acme Corp");
    assert_eq!(acme.location, "Seattle, WA");
    assert_eq!(acme.posted_date, "2024-01-15");
    assert_eq!(acme.expires_date.as_deref(), Some("2/14/2024"));
    assert_eq!(acme.salary, "$160,000 - $190,000");
    assert!(acme.url.ends_with("/jobdetail.aspx?JobID=123"));

    let empty = store.get_job("456").unwrap().expect("job 456 stored");
    assert_eq!(empty.title, "Unknown Title");
    assert_eq!(empty.company, "Unknown Company");
    assert_eq!(empty.location, "Unknown Location");
    assert_eq!(empty.posted_date, "Unknown Date");
    assert_eq!(empty.salary, "Not specified");
    assert_eq!(empty.description, "No description available");
}

#[tokio::test]
async fn test_results_page_without_links_counts_nothing() {
    let board = MockServer::start().await;
    mount_results(&board, &[]).await;

    let store = Arc::new(SqliteStore::new_in_memory().unwrap());
    let report = run(
        test_config(&board, "http://127.0.0.1:9", false),
        Arc::new(CountingEnricher::default()),
        store.clone(),
    )
    .await;

    assert_eq!(report.stats, Default::default());
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.jobs_added_to_cache, 0);
    assert_eq!(store.count_seen_ids().unwrap(), 0);
}

#[tokio::test]
async fn test_dry_run_never_calls_classifier_or_store() {
    let board = MockServer::start().await;
    mount_results(&board, &["1", "2"]).await;
    mount_detail(&board, "1", ACME_DETAIL, 1).await;
    mount_detail(&board, "2", ACME_DETAIL, 1).await;

    let classifier = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&classifier)
        .await;

    let config = test_config(&board, &classifier.uri(), true);
    let enricher = EnrichmentClient::new(&config.enrichment, "unused").unwrap();
    let store = Arc::new(SqliteStore::new_in_memory().unwrap());

    let report = run(config, Arc::new(enricher), store.clone()).await;

    assert_eq!(report.stats.processed, 2);
    assert_eq!(report.stats.successful, 0);
    assert_eq!(report.stats.failed, 0);
    assert_eq!(store.count_jobs().unwrap(), 0);
}

#[tokio::test]
async fn test_classifier_rate_limit_then_success() {
    let board = MockServer::start().await;
    mount_results(&board, &["123"]).await;
    mount_detail(&board, "123", ACME_DETAIL, 1).await;

    let content = serde_json::json!({
        "ParsedDescription": "Payments backend in Rust",
        "DeadlineDate": "",
        "MinDegree": "Bachelor's",
        "MinYearsExperience": 5,
        "Modality": "Hybrid",
        "Domain": "Backend",
        "Languages": ["Rust"],
        "Technologies": ["Kafka", "PostgreSQL"],
        "IsSoftwareEngineerRelated": true
    })
    .to_string();

    let classifier = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&classifier)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })))
        .expect(1)
        .mount(&classifier)
        .await;

    let config = test_config(&board, &classifier.uri(), false);
    let enricher = EnrichmentClient::new(&config.enrichment, "test-key").unwrap();
    let store = Arc::new(SqliteStore::new_in_memory().unwrap());

    let report = run(config, Arc::new(enricher), store.clone()).await;

    assert_eq!(report.stats.successful, 1);
    assert_eq!(report.stats.unrelated, 0);

    let job = store.get_job("123").unwrap().expect("job stored");
    assert_eq!(job.min_degree.as_deref(), Some("Bachelor's"));
    assert_eq!(job.min_years_experience, Some(5));
    assert_eq!(job.modality.as_deref(), Some("Hybrid"));
    assert_eq!(job.domain.as_deref(), Some("Backend"));
    assert_eq!(job.technologies, vec!["Kafka", "PostgreSQL"]);
    assert_eq!(job.expires_date.as_deref(), Some("2/14/2024"));
    assert!(job.is_software_engineer_related);
}

#[tokio::test]
async fn test_classifier_failure_counts_failed_and_stores_nothing() {
    let board = MockServer::start().await;
    mount_results(&board, &["123"]).await;
    mount_detail(&board, "123", ACME_DETAIL, 1).await;

    let classifier = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .expect(1)
        .mount(&classifier)
        .await;

    let config = test_config(&board, &classifier.uri(), false);
    let enricher = EnrichmentClient::new(&config.enrichment, "test-key").unwrap();
    let store = Arc::new(SqliteStore::new_in_memory().unwrap());

    let report = run(config, Arc::new(enricher), store.clone()).await;

    assert_eq!(report.stats.processed, 1);
    assert_eq!(report.stats.failed, 1);
    assert_eq!(store.count_jobs().unwrap(), 0);
}

#[tokio::test]
async fn test_second_run_skips_jobs_seen_by_first() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("jobs.db");

    let board = MockServer::start().await;
    mount_results(&board, &["1", "2"]).await;
    mount_detail(&board, "1", ACME_DETAIL, 1).await;
    mount_detail(&board, "2", ACME_DETAIL, 1).await;

    let first = {
        let store = Arc::new(SqliteStore::new(&db_path).unwrap());
        run(
            test_config(&board, "http://127.0.0.1:9", false),
            Arc::new(CountingEnricher::default()),
            store,
        )
        .await
    };
    assert_eq!(first.stats.processed, 2);
    assert_eq!(first.cache_final_size, 2);

    let store = Arc::new(SqliteStore::new(&db_path).unwrap());
    let second = run(
        test_config(&board, "http://127.0.0.1:9", false),
        Arc::new(CountingEnricher::default()),
        store.clone(),
    )
    .await;

    assert_eq!(second.stats.total, 2);
    assert_eq!(second.stats.skipped, 2);
    assert_eq!(second.stats.processed, 0);
    assert_eq!(second.cache_initial_size, 2);
    assert_eq!(second.jobs_added_to_cache, 0);
    assert_eq!(store.count_jobs().unwrap(), 2);
}
