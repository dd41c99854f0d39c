//! Search query and pagination bounds

use url::Url;

/// Replaces path separators so a keyword can be embedded in a file name
///
/// # Examples
///
/// ```
/// use putusan_scraper::model::sanitize_keyword;
///
/// assert_eq!(sanitize_keyword("Pdt.Sus/BPSK"), "Pdt.Sus BPSK");
/// ```
pub fn sanitize_keyword(keyword: &str) -> String {
    keyword
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect()
}

/// The keyword being searched and the endpoint it is searched on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    keyword: String,
    search_url: Url,
}

impl SearchQuery {
    /// Creates a query against the given search endpoint
    ///
    /// # Returns
    ///
    /// * `Ok(SearchQuery)` - The endpoint parsed
    /// * `Err(url::ParseError)` - The endpoint is not a valid URL
    pub fn new(keyword: impl Into<String>, search_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            keyword: keyword.into(),
            search_url: Url::parse(search_url)?,
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Builds the listing URL for a 1-based result page
    ///
    /// # Examples
    ///
    /// ```
    /// use putusan_scraper::model::SearchQuery;
    ///
    /// let query = SearchQuery::new("korupsi", "https://example.com/search.html").unwrap();
    /// assert_eq!(
    ///     query.page_url(2).as_str(),
    ///     "https://example.com/search.html?q=korupsi&page=2"
    /// );
    /// ```
    pub fn page_url(&self, page: u32) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", &self.keyword)
            .append_pair("page", &page.to_string());
        url
    }
}

/// Size of a result set as reported by its first page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationInfo {
    /// Value of the "Ditemukan N data" banner
    pub total_results: u64,

    /// Highest page index in the pagination control, at least 1
    pub last_page: u32,
}

impl PaginationInfo {
    /// Iterates over every result page index, starting at 1
    pub fn pages(&self) -> impl Iterator<Item = u32> {
        1..=self.last_page
    }
}
