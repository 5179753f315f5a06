//! Sumi-Harvest main entry point
//!
//! This is the command-line interface for the Sumi-Harvest text harvester.

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use sumi_harvest::config::{load_config_with_hash, Config, CrawlConfig};
use sumi_harvest::crawler::crawl;
use sumi_harvest::output::{print_statistics, write_results, CrawlStatistics, TracingSink};
use tracing_subscriber::EnvFilter;

/// Sumi-Harvest: a polite single-site text harvester
///
/// Sumi-Harvest crawls one website from a seed URL while respecting
/// robots.txt, extracts readable text from every page, optionally embeds it,
/// and writes the documents plus a navigation log to disk.
#[derive(Parser, Debug)]
#[command(name = "sumi-harvest")]
#[command(version)]
#[command(about = "A polite single-site text harvester", long_about = None)]
struct Cli {
    /// Seed URL; overrides `seed-url` from the config file
    #[arg(value_name = "URL", required_unless_present = "config")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum number of link hops from the seed
    #[arg(short, long)]
    depth: Option<u32>,

    /// Number of pages processed concurrently
    #[arg(short, long)]
    threads: Option<usize>,

    /// Seconds each worker waits before a request
    #[arg(long)]
    delay: Option<f64>,

    /// Directory receiving the documents and navigation log
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Compute an embedding for every text chunk
    #[arg(long)]
    vectorize: bool,

    /// User agent sent with every request
    #[arg(long)]
    user_agent: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and print it without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;
    let crawl_config = CrawlConfig::from_config(&config).context("Invalid configuration")?;

    if cli.dry_run {
        print_dry_run(&config, &crawl_config);
        return Ok(());
    }

    handle_crawl(crawl_config, &config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_harvest=info,warn"),
            1 => EnvFilter::new("sumi_harvest=debug,info"),
            2 => EnvFilter::new("sumi_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match (&cli.config, &cli.url) {
        (Some(path), _) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        (None, Some(url)) => Config::for_seed(url),
        (None, None) => bail!("Either a URL or --config is required"),
    };

    let crawler = &mut config.crawler;
    if let Some(url) = &cli.url {
        crawler.seed_url = url.clone();
    }
    if let Some(depth) = cli.depth {
        crawler.max_depth = depth;
    }
    if let Some(threads) = cli.threads {
        crawler.concurrency = threads;
    }
    if let Some(delay) = cli.delay {
        crawler.delay_seconds = delay;
    }
    if let Some(user_agent) = &cli.user_agent {
        crawler.user_agent = user_agent.clone();
    }
    if cli.vectorize {
        crawler.vectorize = true;
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output.output_dir = output_dir.clone();
    }

    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn print_dry_run(config: &Config, crawl: &CrawlConfig) {
    println!("=== Sumi-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", crawl.seed());
    println!("  Domain: {}", crawl.domain());
    println!("  Max depth: {}", crawl.max_depth());
    println!("  Concurrency: {}", crawl.concurrency());
    println!("  Delay: {:.2}s", crawl.delay().as_secs_f64());
    println!("  User agent: {}", crawl.user_agent());
    println!("  Request timeout: {}s", crawl.request_timeout().as_secs());

    println!("\nEmbedding:");
    if crawl.vectorize() {
        println!("  Provider: {:?}", crawl.embedding().provider);
        println!("  Dimensions: {}", crawl.embedding().dimensions);
    } else {
        println!("  Disabled");
    }

    println!("\nOutput:");
    println!("  Directory: {}", config.output.output_dir);
    println!("  Documents: {}", config.output.documents_file);
    println!("  Navigation log: {}", config.output.log_file);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(crawl_config: CrawlConfig, config: &Config) -> anyhow::Result<()> {
    let started_at = Utc::now();

    let results = match crawl(crawl_config, Arc::new(TracingSink)).await {
        Ok(results) => results,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };
    let finished_at = Utc::now();

    let (documents_path, log_path) =
        write_results(&results, &config.output).context("Failed to write results")?;

    println!();
    print_statistics(&CrawlStatistics::from_results(
        &results,
        started_at,
        finished_at,
    ));
    println!();
    println!("✓ Documents written to: {}", documents_path.display());
    println!("✓ Navigation log written to: {}", log_path.display());

    Ok(())
}
