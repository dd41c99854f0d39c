//! Per-decision record assembly
//!
//! Turns one detail page URL into one [`Record`]: fetch the page, read its
//! metadata table, then resolve the linked document. The parsed page is
//! dropped before the document download starts, so the pipeline future stays
//! `Send` and can run on any worker.

use crate::crawler::artifact::{find_artifact_link, ArtifactResolver};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::fields::{detail_scope, extract_details, take_heading};
use crate::model::Record;

/// Builds records from detail pages
pub struct RecordPipeline {
    fetcher: PageFetcher,
    artifacts: ArtifactResolver,
    artifact_pattern: String,
}

impl RecordPipeline {
    pub fn new(
        fetcher: PageFetcher,
        artifacts: ArtifactResolver,
        artifact_pattern: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            artifacts,
            artifact_pattern: artifact_pattern.into(),
        }
    }

    pub fn fetcher(&self) -> &PageFetcher {
        &self.fetcher
    }

    /// Builds the record for one detail page
    ///
    /// Never fails: an unreachable page gives a record with only its link set,
    /// and a broken document only blanks the three document columns.
    pub async fn build_record(&self, url: &str) -> Record {
        let page = self.fetcher.fetch(url).await;
        let mut record = Record::new(url);

        if page.is_empty() {
            tracing::warn!("Detail page {} is empty, writing link only", url);
            return record;
        }

        let base_url = page.base_url();
        let artifact_link = {
            let mut document = page.document();
            record.title = take_heading(&mut document);
            extract_details(detail_scope(&document), &mut record);
            find_artifact_link(&document, base_url.as_ref(), &self.artifact_pattern)
        };

        if artifact_link.is_none() {
            tracing::debug!("No document link on {}", url);
        }

        let artifact = self.artifacts.resolve(artifact_link.as_deref()).await;
        record.set_artifact(artifact);

        tracing::debug!("Built record for {} ({})", url, record.case_number);
        record
    }
}
