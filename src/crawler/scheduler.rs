//! Scheduler for managing the crawl frontier
//!
//! This module handles:
//! - The FIFO frontier of pages still to visit
//! - The visited set, so every URL is dequeued at most once
//! - The in-flight counter that decides when the crawl is over
//! - Recording each page's outcome together with its discovered links
//!
//! All of this lives behind one mutex. Critical sections only touch
//! in-memory collections; no I/O happens while the lock is held.

use crate::crawler::parser::DiscoveredLink;
use crate::output::{CrawlResults, NavigationLogEntry, PageResult, ResultAggregator};
use crate::state::PageOutcome;
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use url::Url;

/// Label of the seed page in every path
pub const SEED_LABEL: &str = "Home";

/// A page waiting to be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Normalized URL to fetch
    pub url: Url,

    /// Number of links followed from the seed
    pub depth: u32,

    /// Link labels from the seed to this page
    pub path: Vec<String>,
}

impl FrontierEntry {
    /// Entry for the seed page
    pub fn seed(url: Url) -> Self {
        Self {
            url,
            depth: 0,
            path: vec![SEED_LABEL.to_string()],
        }
    }

    /// Entry for a link found on this page
    pub fn child(&self, link: DiscoveredLink) -> Self {
        let mut path = self.path.clone();
        path.push(link.text);
        Self {
            url: link.url,
            depth: self.depth + 1,
            path,
        }
    }
}

struct CrawlState {
    frontier: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
    in_flight: usize,
    results: ResultAggregator,
}

/// Shared frontier, visited set and result aggregator
///
/// Workers call [`Scheduler::next_entry`] in a loop and report back through
/// exactly one of [`Scheduler::record_outcome`], [`Scheduler::complete`] or
/// [`Scheduler::abandon`] per entry they received.
pub struct Scheduler {
    state: Mutex<CrawlState>,
    wakeup: Notify,
}

impl Scheduler {
    /// Creates a scheduler whose frontier holds only the seed
    pub fn new(seed: Url) -> Self {
        let mut visited = HashSet::new();
        visited.insert(seed.as_str().to_string());

        let mut frontier = VecDeque::new();
        frontier.push_back(FrontierEntry::seed(seed));

        Self {
            state: Mutex::new(CrawlState {
                frontier,
                visited,
                in_flight: 0,
                results: ResultAggregator::new(),
            }),
            wakeup: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CrawlState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes the next entry off the frontier
    ///
    /// Waits while the frontier is empty but other entries are still being
    /// processed, since those may add new links.
    ///
    /// # Returns
    ///
    /// * `Some(FrontierEntry)` - An entry this caller now owns
    /// * `None` - The frontier is empty and nothing is in flight; the crawl is over
    pub async fn next_entry(&self) -> Option<FrontierEntry> {
        loop {
            let notified = {
                let mut state = self.lock();

                if let Some(entry) = state.frontier.pop_front() {
                    state.in_flight += 1;
                    return Some(entry);
                }

                if state.in_flight == 0 {
                    drop(state);
                    self.wakeup.notify_waiters();
                    return None;
                }

                // Registered before the lock is released, so a completion
                // that happens between here and the await is not missed.
                self.wakeup.notified()
            };

            notified.await;
        }
    }

    /// Records a terminal outcome that produced no document or links
    pub fn record_outcome(&self, entry: &FrontierEntry, outcome: PageOutcome) {
        {
            let mut state = self.lock();
            state
                .results
                .add_log_entry(NavigationLogEntry::new(&entry.path, outcome));
            state.in_flight = state.in_flight.saturating_sub(1);
        }
        self.wakeup.notify_waiters();
    }

    /// Records a scraped page and enqueues its unseen links
    ///
    /// `links` must already be normalized and in scope. The document, the
    /// log entry and the new frontier entries are recorded atomically.
    ///
    /// # Returns
    ///
    /// The number of links that were new and got enqueued
    pub fn complete(
        &self,
        entry: &FrontierEntry,
        document: PageResult,
        links: Vec<DiscoveredLink>,
    ) -> usize {
        let enqueued = {
            let mut state = self.lock();
            state.results.add_document(document);
            state
                .results
                .add_log_entry(NavigationLogEntry::new(&entry.path, PageOutcome::Scraped));

            let mut enqueued = 0;
            for link in links {
                if state.visited.insert(link.url.as_str().to_string()) {
                    state.frontier.push_back(entry.child(link));
                    enqueued += 1;
                }
            }

            state.in_flight = state.in_flight.saturating_sub(1);
            enqueued
        };
        self.wakeup.notify_waiters();
        enqueued
    }

    /// Releases an entry whose processing failed without an outcome
    pub fn abandon(&self, _entry: &FrontierEntry) {
        {
            let mut state = self.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
        }
        self.wakeup.notify_waiters();
    }

    /// Snapshot of the documents and navigation log recorded so far
    pub fn results(&self) -> CrawlResults {
        self.lock().results.snapshot()
    }
}

#[cfg(test)]
impl Scheduler {
    /// Number of URLs ever accepted into the frontier (seed included)
    fn visited_count(&self) -> usize {
        self.lock().visited.len()
    }

    /// Number of entries waiting in the frontier
    fn pending(&self) -> usize {
        self.lock().frontier.len()
    }

    /// Number of entries handed out and not yet reported back
    fn in_flight(&self) -> usize {
        self.lock().in_flight
    }
}
