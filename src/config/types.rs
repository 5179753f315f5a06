use crate::config::validation::{validate, validate_delay, validate_user_agent};
use crate::url::{extract_domain, normalize_absolute};
use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub(crate) const DEFAULT_USER_AGENT: &str = "SumiHarvest/1.0 (CLI)";

/// Main configuration structure for Sumi-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Builds a configuration with default settings for the given seed URL
    pub fn for_seed(seed_url: &str) -> Self {
        Self {
            crawler: CrawlerConfig {
                seed_url: seed_url.to_string(),
                max_depth: default_max_depth(),
                concurrency: default_concurrency(),
                delay_seconds: default_delay_seconds(),
                user_agent: default_user_agent(),
                vectorize: false,
                request_timeout_seconds: default_request_timeout(),
            },
            embedding: EmbeddingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Entry point of the crawl; also fixes the in-scope domain
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Maximum number of link hops from the seed (0 = seed page only)
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of pages processed at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Pause before every fetch, applied by each worker independently
    #[serde(rename = "delay-seconds", default = "default_delay_seconds")]
    pub delay_seconds: f64,

    /// Sent with every request and matched against robots.txt groups
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Compute an embedding vector for every text chunk
    #[serde(default)]
    pub vectorize: bool,

    /// Timeout for a single page fetch
    #[serde(
        rename = "request-timeout-seconds",
        default = "default_request_timeout"
    )]
    pub request_timeout_seconds: u64,
}

/// Which embedding backend to load when vectorization is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Local feature-hashing embedder, no network access required
    #[default]
    Hashing,
    /// OpenAI-compatible `/embeddings` endpoint
    OpenAi,
}

/// Embedding backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: EmbeddingProvider,

    /// Output dimensionality of every vector
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Model name sent to remote providers
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the remote provider
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Environment variable holding the remote provider's API key
    #[serde(rename = "api-key-env", default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::default(),
            dimensions: default_dimensions(),
            model: default_model(),
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the result files
    #[serde(rename = "output-dir", default = "default_output_dir")]
    pub output_dir: String,

    /// File name of the JSON document collection
    #[serde(rename = "documents-file", default = "default_documents_file")]
    pub documents_file: String,

    /// File name of the navigation log
    #[serde(rename = "log-file", default = "default_log_file")]
    pub log_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            documents_file: default_documents_file(),
            log_file: default_log_file(),
        }
    }
}

fn default_max_depth() -> u32 {
    2
}

fn default_concurrency() -> usize {
    5
}

fn default_delay_seconds() -> f64 {
    1.0
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_dimensions() -> usize {
    384
}

fn default_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_documents_file() -> String {
    "scraped_data.json".to_string()
}

fn default_log_file() -> String {
    "scraped_log.txt".to_string()
}

/// Validated, read-only settings for one crawl run
///
/// A `CrawlConfig` can only be produced from a configuration that passed
/// validation, so the seed is always an absolute http(s) URL and the domain is
/// always derived from it.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    seed: Url,
    domain: String,
    max_depth: u32,
    concurrency: usize,
    delay: Duration,
    user_agent: String,
    vectorize: bool,
    request_timeout: Duration,
    embedding: EmbeddingConfig,
}

impl CrawlConfig {
    /// Creates a crawl configuration for `seed_url` using default settings
    ///
    /// # Example
    ///
    /// ```
    /// use sumi_harvest::CrawlConfig;
    ///
    /// let config = CrawlConfig::new("https://example.com/docs/").unwrap();
    /// assert_eq!(config.domain(), "example.com");
    /// assert_eq!(config.max_depth(), 2);
    /// ```
    pub fn new(seed_url: &str) -> ConfigResult<Self> {
        Self::from_config(&Config::for_seed(seed_url))
    }

    /// Validates a parsed configuration and freezes it for a run
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        validate(config)?;

        let crawler = &config.crawler;
        let seed = normalize_absolute(&crawler.seed_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", crawler.seed_url, e)))?;
        let domain = extract_domain(&seed).ok_or_else(|| {
            ConfigError::InvalidUrl(format!("Seed URL '{}' has no host", crawler.seed_url))
        })?;

        Ok(Self {
            seed,
            domain,
            max_depth: crawler.max_depth,
            concurrency: crawler.concurrency,
            delay: Duration::try_from_secs_f64(crawler.delay_seconds)
                .map_err(|e| ConfigError::Validation(format!("delay-seconds: {}", e)))?,
            user_agent: crawler.user_agent.clone(),
            vectorize: crawler.vectorize,
            request_timeout: Duration::from_secs(crawler.request_timeout_seconds),
            embedding: config.embedding.clone(),
        })
    }

    /// Returns a copy with a different depth limit
    ///
    /// Every depth is valid, so unlike the checked builders this cannot fail.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns a copy with a different concurrency limit
    pub fn with_concurrency(mut self, concurrency: usize) -> ConfigResult<Self> {
        if !(1..=100).contains(&concurrency) {
            return Err(ConfigError::Validation(format!(
                "concurrency must be between 1 and 100, got {}",
                concurrency
            )));
        }
        self.concurrency = concurrency;
        Ok(self)
    }

    /// Returns a copy with a different per-worker delay
    pub fn with_delay(mut self, delay: Duration) -> ConfigResult<Self> {
        validate_delay(delay.as_secs_f64())?;
        self.delay = delay;
        Ok(self)
    }

    /// Returns a copy with a different user agent
    pub fn with_user_agent(mut self, user_agent: &str) -> ConfigResult<Self> {
        validate_user_agent(user_agent)?;
        self.user_agent = user_agent.to_string();
        Ok(self)
    }

    /// Returns a copy with vectorization switched on or off
    pub fn with_vectorize(mut self, vectorize: bool) -> Self {
        self.vectorize = vectorize;
        self
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn vectorize(&self) -> bool {
        self.vectorize
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn embedding(&self) -> &EmbeddingConfig {
        &self.embedding
    }
}
