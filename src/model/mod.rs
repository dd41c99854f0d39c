//! Data model shared by the crawler and the output sink
//!
//! # Components
//!
//! - `SearchQuery`: The keyword and search endpoint driving a run
//! - `PaginationInfo`: Result count and last page discovered from page 1
//! - `DetailField`: The labelled rows of a decision's metadata table
//! - `Record`: One output row with a fixed, column-stable schema
//! - `Artifact`: The downloaded decision document and its text

mod query;
mod record;

// Re-export main types
pub use query::{sanitize_keyword, PaginationInfo, SearchQuery};
pub use record::{Artifact, DetailField, Record, COLUMNS};
