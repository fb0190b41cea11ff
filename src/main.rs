//! Job-Sieve main entry point
//!
//! This is the command-line interface for the Job-Sieve crawler.

use anyhow::{Context, Result};
use clap::Parser;
use job_sieve::config::{load_config_with_hash, validate, Config};
use job_sieve::output::{load_statistics, print_statistics, print_summary};
use job_sieve::storage::open_store;
use job_sieve::Pipeline;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Job-Sieve: a deduplicating job-listing crawler
///
/// Job-Sieve walks the search results of a job board, skips listings seen in
/// earlier runs, classifies every new listing with an AI model and stores the
/// enriched records in SQLite.
#[derive(Parser, Debug)]
#[command(name = "job-sieve")]
#[command(version = "1.0.0")]
#[command(about = "A deduplicating job-listing crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Search query, overriding the config file
    #[arg(long)]
    query: Option<String>,

    /// Number of results pages to walk, overriding the config file
    #[arg(long)]
    max_pages: Option<u32>,

    /// Use mock enrichment instead of calling the classifier, and store nothing
    #[arg(long)]
    dry_run: bool,

    /// Ignore the job ID cache for this run
    #[arg(long)]
    fresh: bool,

    /// Validate config and show the crawl plan without crawling
    #[arg(long, conflicts_with = "stats")]
    check: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "check")]
    stats: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(query) = &self.query {
            config.crawler.query = query.clone();
        }
        if let Some(max_pages) = self.max_pages {
            config.crawler.max_pages = max_pages;
        }
        if self.dry_run {
            config.enrichment.dry_run = true;
        }
        if self.fresh {
            config.cache.enabled = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    cli.apply_overrides(&mut config);
    validate(&config).context("Invalid command-line override")?;

    if cli.check {
        handle_check(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_run(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("job_sieve=info,warn"),
            1 => EnvFilter::new("job_sieve=debug,info"),
            2 => EnvFilter::new("job_sieve=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --check mode: shows what a run would do
fn handle_check(config: &Config) {
    println!("=== Job-Sieve Plan ===\n");

    println!("Crawler:");
    println!("  Query: {}", config.crawler.query);
    println!("  Base URL: {}", config.crawler.base_url);
    println!("  Results pages: {}", config.crawler.max_pages);
    println!("  Delay between pages: {}ms", config.crawler.request_delay_ms);
    println!("  Parallel detail fetches: {}", config.crawler.detail_concurrency);

    println!("\nEnrichment:");
    if config.enrichment.dry_run {
        println!("  Dry run: mock enrichment, nothing stored");
    } else {
        println!("  Model: {}", config.enrichment.model);
        println!("  Endpoint: {}", config.enrichment.api_base_url);
        println!("  API key variable: {}", config.enrichment.api_key_env);
    }
    println!("  Max concurrency: {}", config.enrichment.max_concurrency);
    println!(
        "  Rate-limit retries: {} attempts, {}ms..{}ms backoff",
        config.enrichment.max_attempts, config.enrichment.base_delay_ms, config.enrichment.max_delay_ms
    );

    println!("\nStorage:");
    println!("  Database: {}", config.output.database_path);
    println!(
        "  Job ID cache: {}",
        if config.cache.enabled { "enabled" } else { "disabled" }
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let store = open_store(Path::new(&config.output.database_path))
        .context("Failed to open job store")?;
    let stats = load_statistics(&store).context("Failed to read statistics")?;

    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl and enrichment run
async fn handle_run(config: Config) -> Result<()> {
    let store = open_store(Path::new(&config.output.database_path))
        .context("Failed to open job store")?;
    let pipeline = Pipeline::from_config(config, Arc::new(store))?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing jobs in progress");
            on_interrupt.cancel();
        }
    });

    match pipeline.run(cancel).await {
        Ok(report) => {
            print_summary(&report);
            tracing::info!("Run completed");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}
