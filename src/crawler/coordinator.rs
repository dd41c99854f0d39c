//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives a run from start to finish:
//! - Discovering the result set bounds from the first search page
//! - Spawning one task per result page on a bounded worker pool
//! - Building every record of a page and handing the batch to the sink
//! - Joining all page tasks before reporting

use crate::config::Config;
use crate::crawler::artifact::{ArtifactResolver, BoilerplateFilter, PdfToText, TextConverter};
use crate::crawler::fetcher::{build_http_client, PageFetcher, RetryPolicy};
use crate::crawler::pagination::{discover_pagination, extract_detail_links};
use crate::crawler::pipeline::RecordPipeline;
use crate::model::{PaginationInfo, SearchQuery};
use crate::output::{CsvSink, OutputResult, RecordSink};
use crate::paths::create_path;
use crate::ScraperError;
use chrono::NaiveDate;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    /// The keyword that was searched
    pub keyword: String,

    /// Date used in the output file name
    pub run_date: NaiveDate,

    /// Result set bounds discovered on page 1
    pub pagination: PaginationInfo,

    /// Page tasks whose batch reached the sink
    pub pages_completed: u32,

    /// Page tasks whose batch was lost (write failure or panic)
    pub pages_failed: u32,

    /// Records appended to the sink
    pub records_written: usize,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    client: Client,
    sink: Arc<dyn RecordSink>,
    converter: Arc<dyn TextConverter>,
    artifact_dir: PathBuf,
    run_date: NaiveDate,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Provisions the output and artifact directories, builds the HTTP client
    /// and uses today's local date as the run date.
    ///
    /// # Arguments
    ///
    /// * `config` - The scraper configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ScraperError)` - A directory or the HTTP client could not be set up
    pub fn new(config: Config) -> Result<Self, ScraperError> {
        let output_dir = create_path(&config.output.output_dir)?;
        let artifact_dir = create_path(&config.output.artifact_dir)?;
        let client = build_http_client(&config)?;
        let converter = Arc::new(PdfToText::new(config.artifact.converter.clone()));

        Ok(Self {
            config: Arc::new(config),
            client,
            sink: Arc::new(CsvSink::new(output_dir)),
            converter,
            artifact_dir,
            run_date: chrono::Local::now().date_naive(),
        })
    }

    /// Replaces the record sink
    pub fn with_sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replaces the document-to-text converter
    pub fn with_converter(mut self, converter: Arc<dyn TextConverter>) -> Self {
        self.converter = converter;
        self
    }

    /// Overrides the date used to name the output file
    pub fn with_run_date(mut self, run_date: NaiveDate) -> Self {
        self.run_date = run_date;
        self
    }

    pub fn run_date(&self) -> NaiveDate {
        self.run_date
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn fetcher(&self) -> PageFetcher {
        PageFetcher::new(
            self.client.clone(),
            RetryPolicy::from_config(&self.config.crawler),
        )
    }

    fn pipeline(&self) -> RecordPipeline {
        let filter = BoilerplateFilter::new(self.config.artifact.boilerplate.clone());
        let artifacts = ArtifactResolver::new(
            self.client.clone(),
            self.artifact_dir.clone(),
            Arc::clone(&self.converter),
            filter,
        );
        RecordPipeline::new(
            self.fetcher(),
            artifacts,
            self.config.artifact.link_pattern.clone(),
        )
    }

    /// Reads the result set bounds from the first search page
    ///
    /// # Returns
    ///
    /// * `Ok(PaginationInfo)` - The bounds
    /// * `Err(ScraperError::Pagination)` - Page 1 is unreachable or has no
    ///   result count
    pub async fn discover(&self, query: &SearchQuery) -> Result<PaginationInfo, ScraperError> {
        let url = query.page_url(1);
        let page = self.fetcher().fetch(url.as_str()).await;

        if page.is_empty() {
            return Err(ScraperError::Pagination {
                url: url.to_string(),
                message: format!("no response after {} attempts", page.attempts),
            });
        }

        let document = page.document();
        discover_pagination(&document).map_err(|message| ScraperError::Pagination {
            url: url.to_string(),
            message,
        })
    }

    /// Runs the crawl for a query
    ///
    /// Every result page is processed by its own task; at most
    /// `crawler.workers` tasks run at once. Returns once all of them have
    /// finished. Only pagination discovery can fail the run; a page whose
    /// batch cannot be written is logged and counted in the report.
    pub async fn run(&self, query: &SearchQuery) -> Result<CrawlReport, ScraperError> {
        let pagination = self.discover(query).await?;
        tracing::info!(
            "Scraping with keyword: {} - {} data - {} page",
            query.keyword(),
            pagination.total_results,
            pagination.last_page
        );

        let workers = self.config.crawler.effective_workers();
        tracing::debug!("Processing result pages with {} workers", workers);

        let semaphore = Arc::new(Semaphore::new(workers));
        let pipeline = Arc::new(self.pipeline());
        let query = Arc::new(query.clone());
        let detail_pattern: Arc<str> = Arc::from(self.config.crawler.detail_pattern.as_str());

        let mut tasks = JoinSet::new();
        for page in pagination.pages() {
            let semaphore = Arc::clone(&semaphore);
            let task = PageTask {
                page,
                query: Arc::clone(&query),
                pipeline: Arc::clone(&pipeline),
                sink: Arc::clone(&self.sink),
                detail_pattern: Arc::clone(&detail_pattern),
                run_date: self.run_date,
            };

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                (page, task.run().await)
            });
        }

        let mut report = CrawlReport {
            keyword: query.keyword().to_string(),
            run_date: self.run_date,
            pagination,
            pages_completed: 0,
            pages_failed: 0,
            records_written: 0,
        };

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((page, Ok(written))) => {
                    tracing::info!("Page {} done: {} records", page, written);
                    report.pages_completed += 1;
                    report.records_written += written;
                }
                Ok((page, Err(e))) => {
                    tracing::error!("Page {} batch lost: {}", page, e);
                    report.pages_failed += 1;
                }
                Err(e) => {
                    tracing::error!("Page task failed: {}", e);
                    report.pages_failed += 1;
                }
            }
        }

        tracing::info!(
            "Crawl completed: {} records from {} pages ({} failed)",
            report.records_written,
            report.pages_completed,
            report.pages_failed
        );

        Ok(report)
    }
}

/// Work for one result listing page
struct PageTask {
    page: u32,
    query: Arc<SearchQuery>,
    pipeline: Arc<RecordPipeline>,
    sink: Arc<dyn RecordSink>,
    detail_pattern: Arc<str>,
    run_date: NaiveDate,
}

impl PageTask {
    /// Lists the page's decisions, builds their records and writes the batch
    async fn run(self) -> OutputResult<usize> {
        let url = self.query.page_url(self.page);
        tracing::debug!("Fetching result page {}", url);

        let listing = self.pipeline.fetcher().fetch(url.as_str()).await;
        let links = {
            let base_url = listing.base_url();
            let document = listing.document();
            extract_detail_links(&document, base_url.as_ref(), &self.detail_pattern)
        };

        if links.is_empty() {
            tracing::warn!("No decisions listed on page {}", self.page);
        }

        let mut records = Vec::with_capacity(links.len());
        for link in &links {
            records.push(self.pipeline.build_record(link).await);
        }

        self.sink
            .append(self.query.keyword(), self.run_date, &records)
    }
}

/// Runs a complete crawl for one keyword
///
/// # Example
///
/// ```no_run
/// use putusan_scraper::config::Config;
/// use putusan_scraper::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(Config::default(), "korupsi").await?;
/// println!("{} records", report.records_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, keyword: &str) -> Result<CrawlReport, ScraperError> {
    let query = SearchQuery::new(keyword, &config.crawler.search_url)?;
    let coordinator = Coordinator::new(config)?;
    coordinator.run(&query).await
}
