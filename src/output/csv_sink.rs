//! Append-only CSV output
//!
//! One file per keyword and run date. The first batch written to a file
//! carries the header; every later batch, from this run or a rerun on the
//! same day, appends data rows only.

use crate::model::{sanitize_keyword, Record, COLUMNS};
use crate::output::traits::{OutputError, OutputResult, RecordSink};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Returns the output file name for a keyword and run date
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use putusan_scraper::output::output_file_name;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// assert_eq!(output_file_name("Pdt.Sus/BPSK", date), "putusan_ma_Pdt.Sus BPSK_2024-03-09.csv");
/// ```
pub fn output_file_name(keyword: &str, run_date: NaiveDate) -> String {
    format!(
        "putusan_ma_{}_{}.csv",
        sanitize_keyword(keyword),
        run_date.format("%Y-%m-%d")
    )
}

/// CSV sink writing into a single output directory
///
/// Holds one lock per physical file, so batches for different keywords or
/// dates never wait on each other.
#[derive(Debug)]
pub struct CsvSink {
    output_dir: PathBuf,
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl CsvSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Full path of the file a keyword and date are written to
    pub fn path_for(&self, keyword: &str, run_date: NaiveDate) -> PathBuf {
        self.output_dir.join(output_file_name(keyword, run_date))
    }

    fn file_lock(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(path.to_path_buf()).or_default())
    }
}

/// Encodes a batch, with the header first when requested
fn encode_batch(records: &[Record], with_header: bool) -> OutputResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    if with_header {
        writer.write_record(COLUMNS)?;
    }
    for record in records {
        writer.write_record(record.to_row())?;
    }

    writer
        .into_inner()
        .map_err(|e| OutputError::Io(e.into_error()))
}

impl RecordSink for CsvSink {
    fn append(&self, keyword: &str, run_date: NaiveDate, records: &[Record]) -> OutputResult<usize> {
        let path = self.path_for(keyword, run_date);
        let lock = self.file_lock(&path);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        let is_new = file.metadata()?.len() == 0;

        let buffer = encode_batch(records, is_new)?;
        file.write_all(&buffer)?;
        file.flush()?;

        tracing::debug!(
            "Appended {} records to {}{}",
            records.len(),
            path.display(),
            if is_new { " (new file)" } else { "" }
        );

        Ok(records.len())
    }
}
