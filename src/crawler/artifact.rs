//! Decision document download and text conversion
//!
//! A detail page links to its decision as a PDF. The resolver downloads it,
//! stores it under the name the server suggests, converts it to text and
//! strips the directory's page template from the result. Every failure along
//! the way collapses to an empty [`Artifact`].

use crate::model::Artifact;
use reqwest::header::{HeaderMap, CONTENT_DISPOSITION};
use reqwest::Client;
use scraper::{Html, Selector};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// Errors that can occur while resolving a document
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Download of {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Download of {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("No filename in Content-Disposition for {url}")]
    MissingFilename { url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Text conversion failed: {0}")]
    Conversion(String),

    #[error("Conversion task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Converts a stored document into plain text
pub trait TextConverter: Send + Sync {
    /// Extracts the text of the document at `path`
    fn convert(&self, path: &Path) -> Result<String, ArtifactError>;
}

/// Converts PDFs with poppler's `pdftotext`
#[derive(Debug, Clone)]
pub struct PdfToText {
    program: String,
}

impl PdfToText {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PdfToText {
    fn default() -> Self {
        Self::new("pdftotext")
    }
}

impl TextConverter for PdfToText {
    fn convert(&self, path: &Path) -> Result<String, ArtifactError> {
        let output = Command::new(&self.program)
            .args(["-enc", "UTF-8"])
            .arg(path)
            .arg("-") // Output to stdout
            .output()
            .map_err(|e| {
                ArtifactError::Conversion(format!(
                    "could not run {} (install poppler-utils): {}",
                    self.program, e
                ))
            })?;

        if !output.status.success() {
            return Err(ArtifactError::Conversion(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Removes the directory's page template from converted text
///
/// Entries are removed as exact substrings, in list order, and the pass is
/// repeated until the text stops changing: a removal that splices a new
/// occurrence together is removed as well. Nothing is normalized, so
/// legitimate text that merely resembles the template stays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoilerplateFilter {
    phrases: Vec<String>,
}

impl BoilerplateFilter {
    pub fn new(phrases: Vec<String>) -> Self {
        Self { phrases }
    }

    /// Returns `text` with every occurrence of every phrase removed
    ///
    /// Applying the filter to its own output returns that output unchanged.
    pub fn apply(&self, text: &str) -> String {
        let mut current = text.to_string();
        loop {
            let next = self.strip_once(&current);
            // Every effective pass shortens the text
            if next.len() == current.len() {
                return next;
            }
            current = next;
        }
    }

    fn strip_once(&self, text: &str) -> String {
        self.phrases
            .iter()
            .filter(|phrase| !phrase.is_empty())
            .fold(text.to_string(), |acc, phrase| acc.replace(phrase.as_str(), ""))
    }
}

/// Finds the document download link on a detail page
///
/// # Arguments
///
/// * `document` - The parsed detail page
/// * `base_url` - URL of the page, for resolving relative links
/// * `pattern` - Substring identifying download links (e.g. `/pdf/`)
///
/// # Returns
///
/// The absolute URL of the first matching link, or `None`
pub fn find_artifact_link(document: &Html, base_url: Option<&Url>, pattern: &str) -> Option<String> {
    let selector = Selector::parse("a[href]").ok()?;

    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|href| href.contains(pattern))
        .and_then(|href| match base_url {
            Some(base) => base.join(href).ok().map(|url| url.to_string()),
            None => Url::parse(href).ok().map(|url| url.to_string()),
        })
}

/// Extracts the filename from a Content-Disposition header value
///
/// The RFC 5987 `filename*=` form is preferred over a plain `filename=`.
pub fn parse_content_disposition(header: &str) -> Option<String> {
    if let Some(pos) = header.find("filename*=") {
        let value = header[pos + 10..].trim();
        // Format: charset'language'encoded_value
        if let Some(quote_pos) = value.find("''") {
            let encoded = &value[quote_pos + 2..];
            let end = encoded.find(';').unwrap_or(encoded.len());
            if let Ok(decoded) = urlencoding::decode(encoded[..end].trim()) {
                if !decoded.is_empty() {
                    return Some(decoded.into_owned());
                }
            }
        }
    }

    let pos = header.find("filename=")?;
    let value = header[pos + 9..].trim();

    if let Some(stripped) = value.strip_prefix('"') {
        let end = stripped.find('"')?;
        let filename = &stripped[..end];
        return (!filename.is_empty()).then(|| filename.to_string());
    }

    let end = value.find(';').unwrap_or(value.len());
    let filename = value[..end].trim();
    (!filename.is_empty()).then(|| filename.to_string())
}

/// Reads the stored filename from a download response's headers
///
/// Header bytes are decoded leniently, so a raw UTF-8 `filename="…"` is kept
/// rather than rejected. Path separators are flattened.
pub fn filename_from_headers(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(CONTENT_DISPOSITION)?;
    let header = String::from_utf8_lossy(value.as_bytes());
    parse_content_disposition(&header).map(|name| flatten_filename(&name))
}

/// Flattens a suggested filename by turning path separators into spaces
pub fn flatten_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect()
}

/// Downloads, stores and converts decision documents
pub struct ArtifactResolver {
    client: Client,
    artifact_dir: PathBuf,
    converter: Arc<dyn TextConverter>,
    filter: BoilerplateFilter,
}

impl ArtifactResolver {
    pub fn new(
        client: Client,
        artifact_dir: impl Into<PathBuf>,
        converter: Arc<dyn TextConverter>,
        filter: BoilerplateFilter,
    ) -> Self {
        Self {
            client,
            artifact_dir: artifact_dir.into(),
            converter,
            filter,
        }
    }

    /// Resolves a document link into an artifact, never failing
    ///
    /// `None` and every error yield the empty artifact.
    pub async fn resolve(&self, link: Option<&str>) -> Artifact {
        let Some(link) = link else {
            return Artifact::default();
        };

        match self.fetch(link).await {
            Ok(artifact) => artifact,
            Err(e) => {
                tracing::warn!("Dropping document {}: {}", link, e);
                Artifact::default()
            }
        }
    }

    /// Downloads a document, stores it and converts it to filtered text
    ///
    /// # Returns
    ///
    /// * `Ok(Artifact)` - The link, stored filename and cleaned text
    /// * `Err(ArtifactError)` - Any stage failed
    pub async fn fetch(&self, link: &str) -> Result<Artifact, ArtifactError> {
        let response = self
            .client
            .get(link)
            .send()
            .await
            .map_err(|source| ArtifactError::Http {
                url: link.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArtifactError::Status {
                url: link.to_string(),
                status: status.as_u16(),
            });
        }

        let filename = filename_from_headers(response.headers()).ok_or_else(|| {
            ArtifactError::MissingFilename {
                url: link.to_string(),
            }
        })?;

        let bytes = response.bytes().await.map_err(|source| ArtifactError::Http {
            url: link.to_string(),
            source,
        })?;

        let path = self.artifact_dir.join(&filename);
        tokio::fs::write(&path, &bytes).await?;
        tracing::debug!("Stored {} ({} bytes)", path.display(), bytes.len());

        let converter = Arc::clone(&self.converter);
        let stored = path.clone();
        let raw_text = tokio::task::spawn_blocking(move || converter.convert(&stored)).await??;

        Ok(Artifact {
            link: link.to_string(),
            filename,
            text: self.filter.apply(&raw_text),
        })
    }
}
