//! Search result parsing
//!
//! This module reads the two things a listing page provides:
//! - The size of the result set (only meaningful on page 1)
//! - Links to the decision detail pages it lists

use crate::model::PaginationInfo;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use url::Url;

/// Attribute carrying the page index on pagination links
const PAGE_INDEX_ATTR: &str = "data-ci-pagination-page";

fn result_count_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Ditemukan ([0-9]+) data").expect("valid regex"))
}

/// Reads the result count and last page index from the first result page
///
/// The count comes from the "Ditemukan N data" banner (looked up in the
/// summary column first, then anywhere on the page). The last page is the
/// highest `data-ci-pagination-page` value among `a.page-link` elements; a
/// result set without pagination links fits on one page.
///
/// # Returns
///
/// * `Ok(PaginationInfo)` - The result set bounds
/// * `Err(String)` - The page has no result count banner
pub fn discover_pagination(document: &Html) -> Result<PaginationInfo, String> {
    let total_results = find_result_count(document)
        .ok_or_else(|| "result count banner 'Ditemukan N data' not found".to_string())?;

    let last_page = match max_page_index(document) {
        Some(page) => page.max(1),
        None => {
            tracing::debug!("No pagination links, assuming a single result page");
            1
        }
    };

    Ok(PaginationInfo {
        total_results,
        last_page,
    })
}

fn find_result_count(document: &Html) -> Option<u64> {
    let pattern = result_count_pattern();
    let parse = |text: &str| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok())
    };

    if let Ok(selector) = Selector::parse("div.col-md-7") {
        for element in document.select(&selector) {
            if let Some(count) = parse(&element.text().collect::<String>()) {
                return Some(count);
            }
        }
    }

    parse(&document.root_element().text().collect::<String>())
}

fn max_page_index(document: &Html) -> Option<u32> {
    let selector = Selector::parse("a.page-link").ok()?;

    document
        .select(&selector)
        .filter_map(|a| a.value().attr(PAGE_INDEX_ATTR))
        .filter_map(|value| value.trim().parse::<u32>().ok())
        .max()
}

/// Extracts detail page links from a result listing page
///
/// Links are returned in document order, resolved against `base_url`. Only
/// hrefs containing `pattern` (e.g. `/direktori/putusan`) are kept.
///
/// # Example
///
/// ```
/// use putusan_scraper::crawler::extract_detail_links;
/// use scraper::Html;
/// use url::Url;
///
/// let html = Html::parse_document(
///     r#"<a href="/direktori/putusan/abc.html">A</a><a href="/about">B</a>"#,
/// );
/// let base = Url::parse("https://example.com/search.html?q=x&page=1").unwrap();
/// let links = extract_detail_links(&html, Some(&base), "/direktori/putusan");
/// assert_eq!(links, vec!["https://example.com/direktori/putusan/abc.html"]);
/// ```
pub fn extract_detail_links(document: &Html, base_url: Option<&Url>, pattern: &str) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if !href.contains(pattern) {
                    continue;
                }
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute HTTP(S) URL
///
/// Returns None if the link is empty, uses a non-HTTP scheme, or cannot be
/// resolved.
fn resolve_link(href: &str, base_url: Option<&Url>) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with("javascript:") || href.starts_with('#') {
        return None;
    }

    let resolved = match base_url {
        Some(base) => base.join(href),
        None => Url::parse(href),
    };

    match resolved {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
