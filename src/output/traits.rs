//! Output sink trait and errors
//!
//! A sink receives one batch of records per result page. Implementations are
//! shared by every page task and must be thread-safe.

use crate::model::Record;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for crawled records
pub trait RecordSink: Send + Sync {
    /// Appends a batch of records for a keyword and run date
    ///
    /// The batch is written as a whole: rows of concurrent batches never
    /// interleave. An empty batch still initializes the destination.
    ///
    /// # Arguments
    ///
    /// * `keyword` - The raw search keyword (sanitized by the sink)
    /// * `run_date` - Date the run started
    /// * `records` - Records in the order they should appear
    ///
    /// # Returns
    ///
    /// The number of records written
    fn append(&self, keyword: &str, run_date: NaiveDate, records: &[Record]) -> OutputResult<usize>;
}
