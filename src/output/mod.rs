//! Output module for persisting crawled records
//!
//! This module handles:
//! - Naming the per-keyword, per-day output file
//! - Writing the header once and appending rows afterwards
//! - Serializing concurrent batch writes to the same file

mod csv_sink;
mod traits;

pub use csv_sink::{output_file_name, CsvSink};
pub use traits::{OutputError, OutputResult, RecordSink};
