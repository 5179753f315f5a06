//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with same-domain redirect handling
//! - HTML parsing, text chunking and link extraction
//! - Frontier scheduling and termination detection
//! - Overall crawl coordination across a bounded worker pool

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, fetch_page, FetchError, FetchedPage, MAX_REDIRECTS};
pub use parser::{
    discover_links, extract_chunks, parse_page, DiscoveredLink, ParsedPage, DEFAULT_LINK_TEXT,
};
pub use scheduler::{FrontierEntry, Scheduler, SEED_LABEL};

use crate::config::CrawlConfig;
use crate::output::{CrawlResults, LogSink};
use crate::HarvestError;
use std::sync::Arc;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client and embedding provider
/// 2. Load robots.txt for the crawl domain
/// 3. Fetch, parse and optionally embed every reachable in-scope page
/// 4. Return the collected documents and navigation log
///
/// # Arguments
///
/// * `config` - The validated crawl configuration
/// * `sink` - Receives progress lines during the run
///
/// # Returns
///
/// * `Ok(CrawlResults)` - Crawl completed
/// * `Err(HarvestError)` - The crawl could not be set up
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use sumi_harvest::output::TracingSink;
/// use sumi_harvest::{crawl, CrawlConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CrawlConfig::new("https://example.com/")?.with_max_depth(1);
/// let results = crawl(config, Arc::new(TracingSink)).await?;
/// let (documents_json, navigation_log) = results.serialize()?;
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    config: CrawlConfig,
    sink: Arc<dyn LogSink>,
) -> Result<CrawlResults, HarvestError> {
    Coordinator::new(config)?.with_sink(sink).run().await
}
