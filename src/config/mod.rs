//! Configuration module for Sumi-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and freezing a validated configuration into a [`CrawlConfig`].
//!
//! # Example
//!
//! ```no_run
//! use sumi_harvest::config::{load_config, CrawlConfig};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! let crawl = CrawlConfig::from_config(&config).unwrap();
//! println!("Crawling {} up to depth {}", crawl.domain(), crawl.max_depth());
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    Config, CrawlConfig, CrawlerConfig, EmbeddingConfig, EmbeddingProvider, OutputConfig,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
