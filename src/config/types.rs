use serde::Deserialize;
use std::time::Duration;

/// Literal lines stamped on every page of the directory's PDF template.
///
/// Removed verbatim (including the trailing newline) from converted text.
/// The strings are the template as a layout-free text extractor renders it;
/// the spaced-out watermark in particular depends on how the converter groups
/// glyphs. When `artifact.converter` lays text out differently (`pdftotext`
/// without `-raw`, for instance), override `artifact.boilerplate` with the
/// lines that converter actually emits, otherwise they pass through.
pub const DEFAULT_BOILERPLATE: &[&str] = &[
    "M a h ka m a h A g u n g R e p u blik In d o n esia\n",
    "Disclaimer\n",
    "Kepaniteraan Mahkamah Agung Republik Indonesia berusaha untuk selalu mencantumkan informasi paling kini dan akurat sebagai bentuk komitmen Mahkamah Agung untuk pelayanan publik, transparansi dan akuntabilitas\n",
    "pelaksanaan fungsi peradilan. Namun dalam hal-hal tertentu masih dimungkinkan terjadi permasalahan teknis terkait dengan akurasi dan keterkinian informasi yang kami sajikan, hal mana akan terus kami perbaiki dari waktu kewaktu.\n",
    "Dalam hal Anda menemukan inakurasi informasi yang termuat pada situs ini atau informasi yang seharusnya ada, namun belum tersedia, maka harap segera hubungi Kepaniteraan Mahkamah Agung RI melalui :\n",
    "Email : kepaniteraan@mahkamahagung.go.id    Telp : 021-384 3348 (ext.318)\n",
];

/// Main configuration structure for the scraper
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    pub artifact: ArtifactConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Search endpoint; `q` and `page` are appended per listing page
    pub search_url: String,

    /// Substring identifying decision detail links on a listing page
    pub detail_pattern: String,

    /// Number of listing pages processed at once (0 = available parallelism)
    pub workers: usize,

    /// Attempts per page fetch, including the first one
    pub max_attempts: u32,

    /// Fixed delay between fetch attempts (milliseconds)
    pub retry_delay: u64,

    /// Per-request timeout (seconds)
    pub request_timeout: u64,
}

impl CrawlerConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Resolves `workers = 0` to the machine's available parallelism
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            search_url: "https://putusan3.mahkamahagung.go.id/search.html".to_string(),
            detail_pattern: "/direktori/putusan".to_string(),
            workers: 0,
            max_attempts: 3,
            retry_delay: 5_000,
            request_timeout: 60,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "putusan-scraper".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory receiving the CSV files
    pub output_dir: String,

    /// Directory receiving downloaded decision documents
    pub artifact_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: "putusan".to_string(),
            artifact_dir: "pdf-putusan".to_string(),
        }
    }
}

/// Decision document handling
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ArtifactConfig {
    /// Substring identifying the document download link on a detail page
    pub link_pattern: String,

    /// Program invoked as `<converter> -enc UTF-8 <file> -`
    pub converter: String,

    /// Exact strings removed from converted text, applied in order
    ///
    /// Must match the output of `converter` byte for byte; see
    /// [`DEFAULT_BOILERPLATE`].
    pub boilerplate: Vec<String>,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            link_pattern: "/pdf/".to_string(),
            converter: "pdftotext".to_string(),
            boilerplate: DEFAULT_BOILERPLATE.iter().map(|s| s.to_string()).collect(),
        }
    }
}
