//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building the HTTP client with the configured user agent
//! - GET requests for search listings and detail pages
//! - Fixed-interval retry for transient failures
//! - Degrading exhausted retries to an empty page

use crate::config::{Config, CrawlerConfig};
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use url::Url;

/// Result of a single fetch attempt
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, unreadable body, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// How often and how patiently a page fetch is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,

    /// Fixed sleep between two attempts
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            delay: config.retry_delay(),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

/// A fetched page, or the empty page left after retries ran out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL the body was served from (the requested URL for an empty page)
    pub url: String,

    /// Raw HTML, empty when every attempt failed
    pub body: String,

    /// Number of attempts that were made
    pub attempts: u32,
}

impl FetchedPage {
    /// An empty page for a URL that could not be fetched
    pub fn empty(url: &str, attempts: u32) -> Self {
        Self {
            url: url.to_string(),
            body: String::new(),
            attempts,
        }
    }

    /// Returns true if nothing can be extracted from this page
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Parses the body into a document
    ///
    /// An empty page parses to a document without any matching elements.
    pub fn document(&self) -> Html {
        Html::parse_document(&self.body)
    }

    /// Base URL for resolving relative links found on the page
    pub fn base_url(&self) -> Option<Url> {
        Url::parse(&self.url).ok()
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The scraper configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use putusan_scraper::config::Config;
/// use putusan_scraper::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(config.crawler.request_timeout())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages with a fixed retry budget
///
/// Cloning is cheap: the underlying client is reference counted, so a fetcher
/// can be shared by every page task.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    policy: RetryPolicy,
}

impl PageFetcher {
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Performs one GET request and classifies the outcome
    pub async fn fetch_once(&self, url: &str) -> FetchResult {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                let error = if e.is_timeout() {
                    "Request timeout".to_string()
                } else if e.is_connect() {
                    "Connection refused".to_string()
                } else {
                    e.to_string()
                };
                return FetchResult::NetworkError { error };
            }
        };

        let status = response.status();
        if !status.is_success() {
            return FetchResult::HttpError {
                status_code: status.as_u16(),
            };
        }

        let final_url = response.url().to_string();
        match response.text().await {
            Ok(body) => FetchResult::Success {
                final_url,
                status_code: status.as_u16(),
                body,
            },
            Err(e) => FetchResult::NetworkError {
                error: e.to_string(),
            },
        }
    }

    /// Fetches a URL, retrying failed attempts after a fixed delay
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 2xx | Return page |
    /// | Other HTTP status | Retry after `delay` |
    /// | Network error | Retry after `delay` |
    /// | Attempts exhausted | Return empty page |
    ///
    /// Never fails: callers treat an empty page as "no data extractable".
    pub async fn fetch(&self, url: &str) -> FetchedPage {
        let max_attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.fetch_once(url).await {
                FetchResult::Success {
                    final_url,
                    status_code,
                    body,
                } => {
                    tracing::debug!(
                        "Fetched {} (HTTP {}, attempt {}/{})",
                        url,
                        status_code,
                        attempt,
                        max_attempts
                    );
                    return FetchedPage {
                        url: final_url,
                        body,
                        attempts: attempt,
                    };
                }
                FetchResult::HttpError { status_code } => {
                    tracing::warn!(
                        "HTTP {} for {} (attempt {}/{})",
                        status_code,
                        url,
                        attempt,
                        max_attempts
                    );
                }
                FetchResult::NetworkError { error } => {
                    tracing::warn!(
                        "Fetch of {} failed: {} (attempt {}/{})",
                        url,
                        error,
                        attempt,
                        max_attempts
                    );
                }
            }

            if attempt < max_attempts {
                tokio::time::sleep(self.policy.delay).await;
            }
        }

        tracing::error!("Giving up on {} after {} attempts", url, max_attempts);
        FetchedPage::empty(url, max_attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_fetcher() -> PageFetcher {
        let client = build_http_client(&Config::default()).unwrap();
        PageFetcher::new(
            client,
            RetryPolicy {
                max_attempts: 3,
                delay: Duration::from_millis(0),
            },
        )
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&Config::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_policy_from_config() {
        let mut config = Config::default();
        config.crawler.max_attempts = 4;
        config.crawler.retry_delay = 1500;

        let policy = RetryPolicy::from_config(&config.crawler);
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.delay, Duration::from_millis(1500));
        assert_eq!(RetryPolicy::default().max_attempts, 3);
    }

    #[test]
    fn test_empty_page_parses_to_empty_document() {
        let page = FetchedPage::empty("https://example.com/x", 3);
        assert!(page.is_empty());

        let document = page.document();
        let selector = scraper::Selector::parse("td").unwrap();
        assert_eq!(document.select(&selector).count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_success_first_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let page = test_fetcher().fetch(&format!("{}/page", server.uri())).await;

        assert_eq!(page.body, "<html>ok</html>");
        assert_eq!(page.attempts, 1);
    }

    #[tokio::test]
    async fn test_fetch_recovers_after_two_failures() {
        let server = MockServer::start().await;

        // First two requests fail, the third one succeeds
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>third</html>"))
            .mount(&server)
            .await;

        let page = test_fetcher().fetch(&format!("{}/flaky", server.uri())).await;

        assert!(!page.is_empty());
        assert_eq!(page.body, "<html>third</html>");
        assert_eq!(page.attempts, 3);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_gives_up_with_empty_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let url = format!("{}/down", server.uri());
        let page = test_fetcher().fetch(&url).await;

        assert!(page.is_empty());
        assert_eq!(page.url, url);
        assert_eq!(page.attempts, 3);
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_network_error_is_retried() {
        // Nothing listens on this port once the server is dropped
        let uri = {
            let server = MockServer::start().await;
            server.uri()
        };

        let page = test_fetcher().fetch(&format!("{}/gone", uri)).await;
        assert!(page.is_empty());
        assert_eq!(page.attempts, 3);
    }
}
