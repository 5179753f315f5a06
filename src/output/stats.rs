//! Statistics for a finished crawl
//!
//! Derived from the result set after the run, then printed by the binary.

use crate::output::CrawlResults;
use crate::state::PageOutcome;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Number of frontier entries that reached a terminal outcome
    pub total_processed: usize,

    /// Count of entries by outcome label
    pub pages_by_outcome: HashMap<&'static str, usize>,

    /// Failure details and how often each occurred
    pub error_summary: HashMap<String, usize>,

    /// Documents in the collection
    pub documents: usize,

    /// Total chunks across all documents
    pub total_chunks: usize,

    /// Chunks that carry an embedding
    pub vectorized_chunks: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlStatistics {
    /// Computes statistics from a result set and the run's time window
    pub fn from_results(
        results: &CrawlResults,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let mut pages_by_outcome = HashMap::new();
        let mut error_summary = HashMap::new();

        for entry in &results.navigation_log {
            *pages_by_outcome.entry(entry.outcome.label()).or_insert(0) += 1;
            if let PageOutcome::Failed(reason) = &entry.outcome {
                *error_summary.entry(reason.clone()).or_insert(0) += 1;
            }
        }

        let total_chunks = results.documents.iter().map(|d| d.chunks.len()).sum();
        let vectorized_chunks = results
            .documents
            .iter()
            .map(|d| d.vectorized_chunks())
            .sum();

        Self {
            total_processed: results.navigation_log.len(),
            pages_by_outcome,
            error_summary,
            documents: results.documents.len(),
            total_chunks,
            vectorized_chunks,
            started_at,
            finished_at,
        }
    }

    /// Wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Count for one outcome label (0 when absent)
    pub fn count(&self, label: &str) -> usize {
        self.pages_by_outcome.get(label).copied().unwrap_or(0)
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to print
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    println!("  Finished: {}", stats.finished_at.to_rfc3339());
    println!("  Duration: {:.1}s", stats.duration_seconds());
    println!("  Pages processed: {}", stats.total_processed);
    println!("  Documents: {}", stats.documents);
    println!(
        "  Chunks: {} ({} vectorized)",
        stats.total_chunks, stats.vectorized_chunks
    );
    println!();

    println!("Pages by Outcome:");
    let mut outcome_counts: Vec<_> = stats.pages_by_outcome.iter().collect();
    outcome_counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

    for (label, count) in outcome_counts {
        let percentage = if stats.total_processed > 0 {
            (*count as f64 / stats.total_processed as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", label, count, percentage);
    }
    println!();

    if !stats.error_summary.is_empty() {
        println!("Error Summary:");
        let mut error_counts: Vec<_> = stats.error_summary.iter().collect();
        error_counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

        for (reason, count) in error_counts {
            println!("  {}: {}", reason, count);
        }
        println!();
    }

    let scraped = stats.count(PageOutcome::Scraped.label());
    let success_rate = if stats.total_processed > 0 {
        (scraped as f64 / stats.total_processed as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} pages scraped)",
        success_rate, scraped, stats.total_processed
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{ChunkRecord, NavigationLogEntry, PageResult};
    use chrono::Duration;

    fn results() -> CrawlResults {
        let home = vec!["Home".to_string()];
        CrawlResults {
            documents: vec![PageResult::new(
                "https://example.com/",
                &home,
                vec![
                    ChunkRecord {
                        text: "a".to_string(),
                        vector: Some(vec![1.0]),
                    },
                    ChunkRecord {
                        text: "b".to_string(),
                        vector: None,
                    },
                ],
            )],
            navigation_log: vec![
                NavigationLogEntry::new(&home, PageOutcome::Scraped),
                NavigationLogEntry::new(&home, PageOutcome::DeniedByRobots),
                NavigationLogEntry::new(&home, PageOutcome::Failed("HTTP Error: 500".into())),
                NavigationLogEntry::new(&home, PageOutcome::Failed("HTTP Error: 500".into())),
            ],
        }
    }

    #[test]
    fn test_statistics_from_results() {
        let started = Utc::now();
        let finished = started + Duration::milliseconds(2500);
        let stats = CrawlStatistics::from_results(&results(), started, finished);

        assert_eq!(stats.total_processed, 4);
        assert_eq!(stats.count("scraped"), 1);
        assert_eq!(stats.count("denied_by_robots"), 1);
        assert_eq!(stats.count("failed"), 2);
        assert_eq!(stats.count("skipped_not_html"), 0);
        assert_eq!(stats.error_summary.get("HTTP Error: 500"), Some(&2));
        assert_eq!(stats.documents, 1);
        assert_eq!(stats.total_chunks, 2);
        assert_eq!(stats.vectorized_chunks, 1);
        assert!((stats.duration_seconds() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_statistics_empty() {
        let now = Utc::now();
        let stats = CrawlStatistics::from_results(&CrawlResults::default(), now, now);
        assert_eq!(stats.total_processed, 0);
        assert!(stats.pages_by_outcome.is_empty());
        print_statistics(&stats);
    }
}
