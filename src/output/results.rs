//! Document collection and navigation log
//!
//! Workers append to a [`ResultAggregator`] while the crawl runs. Once the run
//! has finished, a [`CrawlResults`] snapshot is taken and serialized into the
//! two artifacts the caller receives.

use crate::state::PageOutcome;
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fmt;

/// Separator between link labels in a page path
pub const PATH_SEPARATOR: &str = " -> ";

/// One text segment of a page and its embedding, if computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
}

/// Extracted content of one successfully scraped page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// Normalized URL of the page (as dequeued, before redirects)
    pub url: String,

    /// Link-label chain from the seed, joined with `" -> "`
    pub path: String,

    /// Text chunks in document order
    pub chunks: Vec<ChunkRecord>,
}

impl PageResult {
    /// Builds a result from a label chain
    pub fn new(url: &str, path: &[String], chunks: Vec<ChunkRecord>) -> Self {
        Self {
            url: url.to_string(),
            path: join_path(path),
            chunks,
        }
    }

    /// Number of chunks that carry a vector
    pub fn vectorized_chunks(&self) -> usize {
        self.chunks.iter().filter(|c| c.vector.is_some()).count()
    }
}

/// One line of the navigation trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationLogEntry {
    pub path: String,
    pub outcome: PageOutcome,
}

impl NavigationLogEntry {
    pub fn new(path: &[String], outcome: PageOutcome) -> Self {
        Self {
            path: join_path(path),
            outcome,
        }
    }
}

impl fmt::Display for NavigationLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ==> {}", self.path, self.outcome)
    }
}

/// Joins a label chain the way it appears in documents and the log
pub fn join_path(path: &[String]) -> String {
    path.join(PATH_SEPARATOR)
}

/// Append-only accumulator for documents and navigation entries
///
/// Not synchronized on its own; the scheduler keeps it behind the same lock
/// as the frontier so a page's document, log entry and discovered links are
/// recorded together.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    documents: Vec<PageResult>,
    navigation_log: Vec<NavigationLogEntry>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&mut self, document: PageResult) {
        self.documents.push(document);
    }

    pub fn add_log_entry(&mut self, entry: NavigationLogEntry) {
        self.navigation_log.push(entry);
    }

    /// Copies the current contents into an immutable result set
    pub fn snapshot(&self) -> CrawlResults {
        CrawlResults {
            documents: self.documents.clone(),
            navigation_log: self.navigation_log.clone(),
        }
    }
}

/// Final result set of a crawl
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlResults {
    pub documents: Vec<PageResult>,
    pub navigation_log: Vec<NavigationLogEntry>,
}

impl CrawlResults {
    /// Serializes the document collection as 4-space indented JSON
    ///
    /// Non-ASCII text is written as-is; chunks without a vector omit the
    /// `vector` key.
    pub fn documents_json(&self) -> Result<String, serde_json::Error> {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
        self.documents.serialize(&mut serializer)?;

        // serde_json only ever writes valid UTF-8
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Renders the navigation log, one `"<path> ==> <outcome>"` line per entry
    pub fn navigation_log_text(&self) -> String {
        self.navigation_log
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Returns `(documents JSON, navigation log text)`
    pub fn serialize(&self) -> Result<(String, String), serde_json::Error> {
        Ok((self.documents_json()?, self.navigation_log_text()))
    }

    /// Parses a document collection previously produced by [`documents_json`]
    ///
    /// [`documents_json`]: CrawlResults::documents_json
    pub fn from_documents_json(json: &str) -> Result<Vec<PageResult>, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Count of navigation entries with the given outcome label
    pub fn count_outcome(&self, label: &str) -> usize {
        self.navigation_log
            .iter()
            .filter(|entry| entry.outcome.label() == label)
            .count()
    }
}
