//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl run that coordinates all aspects of the
//! crawling process, including:
//! - Loading the robots.txt policy for the crawl domain
//! - Running a fixed pool of workers over the shared frontier
//! - Fetching, parsing, embedding and link extraction for each page
//! - Containing worker failures so the crawl carries on

use crate::config::CrawlConfig;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchError};
use crate::crawler::parser::{parse_page, DiscoveredLink};
use crate::crawler::scheduler::{FrontierEntry, Scheduler};
use crate::embed::{attach_vectors, build_embedder, Embedder, NoopEmbedder};
use crate::output::{join_path, CrawlResults, LogSink, PageResult, TracingSink};
use crate::robots::{robots_url_for, RobotsGate};
use crate::state::PageOutcome;
use crate::url::check_scope;
use crate::HarvestError;
use reqwest::Client;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: CrawlConfig,
    client: Client,
    embedder: Arc<dyn Embedder>,
    sink: Arc<dyn LogSink>,
}

/// Result of running the pipeline for one frontier entry
enum Processed {
    /// Terminal outcome without a document
    Finished(PageOutcome),

    /// Page produced a document; `links` are in scope but not yet deduplicated
    Scraped {
        document: PageResult,
        links: Vec<DiscoveredLink>,
    },
}

/// Everything a worker needs, shared by all workers of one run
struct WorkerContext {
    config: CrawlConfig,
    client: Client,
    robots: RobotsGate,
    embedder: Arc<dyn Embedder>,
    sink: Arc<dyn LogSink>,
    scheduler: Scheduler,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Builds the HTTP client and, when vectorization is enabled, loads the
    /// configured embedding provider. Progress lines go to `tracing` until a
    /// different sink is set with [`Coordinator::with_sink`].
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawl configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarvestError)` - HTTP client or embedding provider could not be built
    pub fn new(config: CrawlConfig) -> Result<Self, HarvestError> {
        let client = build_http_client(config.user_agent(), config.request_timeout())?;

        let embedder: Arc<dyn Embedder> = if config.vectorize() {
            build_embedder(config.embedding(), config.request_timeout())?
        } else {
            Arc::new(NoopEmbedder)
        };

        Ok(Self {
            config,
            client,
            embedder,
            sink: Arc::new(TracingSink),
        })
    }

    /// Sends progress lines to `sink` instead of `tracing`
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replaces the embedding provider
    ///
    /// The provider is only consulted when vectorization is enabled.
    pub fn with_embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = embedder;
        self
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Runs the crawl to completion
    ///
    /// The run ends when the frontier is empty and no worker is processing a
    /// page. Page-level failures are recorded in the navigation log or, for
    /// worker failures, reported to the sink; they never abort the run.
    ///
    /// # Returns
    ///
    /// The documents and navigation log collected during the run
    pub async fn run(&self) -> Result<CrawlResults, HarvestError> {
        let seed = self.config.seed().clone();
        let user_agent = self.config.user_agent();

        match robots_url_for(&seed) {
            Some(robots_url) => self
                .sink
                .emit(&format!("Reading robots.txt from: {}", robots_url)),
            None => self
                .sink
                .emit("Could not derive robots.txt location; allowing all paths"),
        }
        let robots = RobotsGate::initialize(&self.client, &seed).await;
        if let Some(delay) = robots.crawl_delay(user_agent) {
            tracing::info!(
                "robots.txt advertises a crawl delay of {}s for {}",
                delay,
                user_agent
            );
        }

        if self.config.vectorize() {
            self.sink.emit(&format!(
                "Vectorizing chunks with {}-dimensional embeddings",
                self.embedder.dimensions()
            ));
        }

        self.sink.emit(&format!(
            "Starting crawl of {} (depth limit {}, {} workers)",
            seed,
            self.config.max_depth(),
            self.config.concurrency()
        ));

        let context = Arc::new(WorkerContext {
            config: self.config.clone(),
            client: self.client.clone(),
            robots,
            embedder: Arc::clone(&self.embedder),
            sink: Arc::clone(&self.sink),
            scheduler: Scheduler::new(seed),
        });

        let mut workers = JoinSet::new();
        for worker_id in 0..self.config.concurrency() {
            workers.spawn(run_worker(worker_id, Arc::clone(&context)));
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Worker task ended abnormally: {}", e);
            }
        }

        let results = context.scheduler.results();
        self.sink.emit(&format!(
            "Crawl finished: {} pages processed, {} documents collected",
            results.navigation_log.len(),
            results.documents.len()
        ));

        Ok(results)
    }
}

/// Takes entries until the scheduler reports the crawl is over
async fn run_worker(worker_id: usize, context: Arc<WorkerContext>) {
    tracing::debug!("Worker {} started", worker_id);

    while let Some(entry) = context.scheduler.next_entry().await {
        let task_context = Arc::clone(&context);
        let task_entry = entry.clone();
        let pipeline =
            tokio::spawn(async move { process_entry(&task_context, &task_entry).await });

        let failure = match pipeline.await {
            Ok(Ok(Processed::Finished(outcome))) => {
                context.scheduler.record_outcome(&entry, outcome);
                continue;
            }
            Ok(Ok(Processed::Scraped { document, links })) => {
                let enqueued = context.scheduler.complete(&entry, document, links);
                tracing::debug!("{} new links enqueued from {}", enqueued, entry.url);
                continue;
            }
            Ok(Err(e)) => e,
            Err(e) => HarvestError::Worker(e.to_string()),
        };

        context
            .sink
            .emit(&format!("Worker failed on {}: {}", entry.url, failure));
        context.scheduler.abandon(&entry);
    }

    tracing::debug!("Worker {} finished", worker_id);
}

/// Runs the robots, fetch, parse and embed steps for one entry
///
/// Nothing is recorded here; the caller reports the returned value to the
/// scheduler so every entry is released exactly once, even on panic.
async fn process_entry(
    context: &WorkerContext,
    entry: &FrontierEntry,
) -> Result<Processed, HarvestError> {
    let config = &context.config;
    let sink = &context.sink;

    if !context.robots.can_fetch(config.user_agent(), &entry.url) {
        sink.emit(&format!("Denied by robots.txt: {}", entry.url));
        return Ok(Processed::Finished(PageOutcome::DeniedByRobots));
    }

    if !config.delay().is_zero() {
        tokio::time::sleep(config.delay()).await;
    }

    sink.emit(&format!(
        "Scraping [Depth {}]: {}",
        entry.depth,
        join_path(&entry.path)
    ));

    let page = match fetch_page(&context.client, &entry.url).await {
        Ok(page) => page,
        Err(FetchError::NotHtml { content_type }) => {
            sink.emit(&format!(
                "Skipping non-HTML content at {} ({})",
                entry.url,
                if content_type.is_empty() {
                    "no content type"
                } else {
                    content_type.as_str()
                }
            ));
            return Ok(Processed::Finished(PageOutcome::SkippedNotHtml));
        }
        Err(e) => {
            sink.emit(&format!("Error fetching {}: {}", entry.url, e));
            return Ok(Processed::Finished(PageOutcome::Failed(e.to_string())));
        }
    };

    let discover = entry.depth < config.max_depth();
    let parsed = parse_page(&page.body, &page.final_url, discover);

    if parsed.chunks.is_empty() {
        tracing::debug!("No text content on {}", entry.url);
        return Ok(Processed::Finished(PageOutcome::Scraped));
    }

    let vectors = if config.vectorize() {
        context.embedder.embed(&parsed.chunks).await?
    } else {
        Vec::new()
    };
    let chunks = attach_vectors(parsed.chunks, vectors)?;
    let document = PageResult::new(entry.url.as_str(), &entry.path, chunks);

    let links = parsed
        .links
        .into_iter()
        .filter(|link| match check_scope(&link.url, config.domain()) {
            Ok(()) => true,
            Err(rejection) => {
                tracing::trace!("Not following {}: {}", link.url, rejection);
                false
            }
        })
        .collect();

    Ok(Processed::Scraped { document, links })
}
