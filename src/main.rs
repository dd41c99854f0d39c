//! Putusan Scraper main entry point
//!
//! This is the command-line interface for the decision directory scraper.

use clap::Parser;
use std::path::PathBuf;
use putusan_scraper::config::{load_config_with_hash, validate, Config};
use putusan_scraper::crawler::crawl;
use putusan_scraper::model::SearchQuery;
use putusan_scraper::output::output_file_name;
use tracing_subscriber::EnvFilter;

/// Putusan Scraper: Supreme Court decision directory crawler
///
/// Searches the decision directory for a keyword, collects the metadata and
/// PDF text of every matching decision and appends them to a CSV file named
/// after the keyword and today's date.
#[derive(Parser, Debug)]
#[command(name = "putusan-scraper")]
#[command(version)]
#[command(about = "Supreme Court decision directory scraper", long_about = None)]
struct Cli {
    /// Search keyword
    #[arg(short, long)]
    keyword: String,

    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Directory receiving the CSV files
    #[arg(long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Directory receiving the downloaded PDF documents
    #[arg(long, value_name = "DIR")]
    pdf_dir: Option<String>,

    /// Number of result pages processed at once (0 = available parallelism)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without scraping
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli);
    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        handle_dry_run(&config, &cli.keyword)?;
    } else {
        handle_crawl(config, &cli.keyword).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("putusan_scraper=info,warn"),
            1 => EnvFilter::new("putusan_scraper=debug,info"),
            2 => EnvFilter::new("putusan_scraper=trace,debug"),
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

/// Command-line flags win over the configuration file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(dir) = &cli.output_dir {
        config.output.output_dir = dir.clone();
    }
    if let Some(dir) = &cli.pdf_dir {
        config.output.artifact_dir = dir.clone();
    }
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config, keyword: &str) -> Result<(), Box<dyn std::error::Error>> {
    let query = SearchQuery::new(keyword, &config.crawler.search_url)?;
    let today = chrono::Local::now().date_naive();

    println!("=== Putusan Scraper Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Search URL: {}", config.crawler.search_url);
    println!("  Detail link pattern: {}", config.crawler.detail_pattern);
    println!("  Workers: {}", config.crawler.effective_workers());
    println!("  Max attempts: {}", config.crawler.max_attempts);
    println!("  Retry delay: {}ms", config.crawler.retry_delay);
    println!("  Request timeout: {}s", config.crawler.request_timeout);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  CSV directory: {}", config.output.output_dir);
    println!("  PDF directory: {}", config.output.artifact_dir);
    println!("  CSV file: {}", output_file_name(keyword, today));

    println!("\nDocuments:");
    println!("  Link pattern: {}", config.artifact.link_pattern);
    println!("  Converter: {}", config.artifact.converter);
    println!("  Boilerplate lines: {}", config.artifact.boilerplate.len());

    println!("\n✓ Configuration is valid");
    println!("✓ Would start from: {}", query.page_url(1));

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, keyword: &str) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting scrape for keyword: {}", keyword);

    match crawl(config, keyword).await {
        Ok(report) => {
            tracing::info!(
                "Scrape completed: {} records from {}/{} pages ({} results reported)",
                report.records_written,
                report.pages_completed,
                report.pagination.last_page,
                report.pagination.total_results
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}
