//! Crawler module for the decision directory
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Result page parsing and pagination discovery
//! - Detail page field extraction and document resolution
//! - Overall crawl coordination

mod artifact;
mod coordinator;
mod fetcher;
mod fields;
mod pagination;
mod pipeline;

pub use artifact::{
    filename_from_headers, find_artifact_link, parse_content_disposition, ArtifactError,
    ArtifactResolver, BoilerplateFilter, PdfToText, TextConverter,
};
pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use fetcher::{build_http_client, FetchResult, FetchedPage, PageFetcher, RetryPolicy};
pub use fields::{detail_scope, extract_details, extract_field, take_heading};
pub use pagination::{discover_pagination, extract_detail_links};
pub use pipeline::RecordPipeline;

use crate::config::Config;
use crate::ScraperError;

/// Runs a complete crawl for one keyword
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Provision the output and document directories
/// 2. Discover the number of result pages
/// 3. Process every result page concurrently
/// 4. Append each page's records to the day's CSV file
///
/// # Arguments
///
/// * `config` - The scraper configuration
/// * `keyword` - The search keyword
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed
/// * `Err(ScraperError)` - The result set could not be discovered
pub async fn crawl(config: Config, keyword: &str) -> Result<CrawlReport, ScraperError> {
    run_crawl(config, keyword).await
}
