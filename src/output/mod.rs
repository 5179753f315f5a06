//! Output module for crawl results and progress reporting
//!
//! This module handles:
//! - Accumulating documents and the navigation log during a crawl
//! - Serializing the final result set and writing it to disk
//! - Delivering progress lines to a caller-chosen sink
//! - Recording crawl statistics

mod results;
mod sink;
pub mod stats;

pub use results::{
    join_path, ChunkRecord, CrawlResults, NavigationLogEntry, PageResult, ResultAggregator,
    PATH_SEPARATOR,
};
pub use sink::{CallbackSink, ChannelSink, LogSink, TracingSink};
pub use stats::{print_statistics, CrawlStatistics};

use crate::config::OutputConfig;
use crate::HarvestError;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes the document collection and navigation log into the output directory
///
/// # Arguments
///
/// * `results` - The finished result set
/// * `config` - Output directory and file names
///
/// # Returns
///
/// * `Ok((documents_path, log_path))` - Paths of the written files
/// * `Err(HarvestError)` - Serialization or IO failure
pub fn write_results(
    results: &CrawlResults,
    config: &OutputConfig,
) -> Result<(PathBuf, PathBuf), HarvestError> {
    let (documents, log) = results.serialize()?;

    let output_dir = Path::new(&config.output_dir);
    fs::create_dir_all(output_dir)?;

    let documents_path = output_dir.join(&config.documents_file);
    let log_path = output_dir.join(&config.log_file);

    fs::write(&documents_path, documents)?;
    fs::write(&log_path, log)?;

    tracing::info!(
        "Wrote {} documents to {} and {} log entries to {}",
        results.documents.len(),
        documents_path.display(),
        results.navigation_log.len(),
        log_path.display()
    );

    Ok((documents_path, log_path))
}
