//! Configuration module for the scraper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so a run without a config file uses
//! [`Config::default`].
//!
//! # Example
//!
//! ```no_run
//! use putusan_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scraper.toml")).unwrap();
//! println!("Search endpoint: {}", config.crawler.search_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ArtifactConfig, Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_BOILERPLATE,
};

// Re-export parser functions
pub use parser::{config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
