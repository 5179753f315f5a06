use crate::config::types::{Config, CrawlerConfig, EmbeddingConfig, EmbeddingProvider, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on simultaneous pipelines
const MAX_CONCURRENCY: usize = 100;

/// Upper bound on embedding dimensionality
const MAX_DIMENSIONS: usize = 4096;

/// Upper bound on the per-worker delay, in seconds
const MAX_DELAY_SECONDS: f64 = 3600.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_embedding_config(&config.embedding)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_seed_url(&config.seed_url)?;

    // max_depth >= 0 is always true for u32, so no check needed

    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    validate_delay(config.delay_seconds)?;

    if config.request_timeout_seconds < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-seconds must be >= 1".to_string(),
        ));
    }

    validate_user_agent(&config.user_agent)?;

    Ok(())
}

/// Validates the per-worker delay in seconds
pub(crate) fn validate_delay(seconds: f64) -> Result<(), ConfigError> {
    if !seconds.is_finite() || !(0.0..=MAX_DELAY_SECONDS).contains(&seconds) {
        return Err(ConfigError::Validation(format!(
            "delay-seconds must be between 0 and {}, got {}",
            MAX_DELAY_SECONDS, seconds
        )));
    }

    Ok(())
}

/// Validates the seed URL: absolute, http(s), with a host
fn validate_seed_url(seed_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(seed_url.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' must use http or https",
            seed_url
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host",
            seed_url
        )));
    }

    Ok(())
}

/// Validates a user agent string so it can be sent as a header value
pub(crate) fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if !user_agent.chars().all(|c| c.is_ascii() && !c.is_ascii_control()) {
        return Err(ConfigError::Validation(format!(
            "user-agent must contain printable ASCII only, got '{}'",
            user_agent
        )));
    }

    Ok(())
}

/// Validates embedding configuration
fn validate_embedding_config(config: &EmbeddingConfig) -> Result<(), ConfigError> {
    if config.dimensions < 1 || config.dimensions > MAX_DIMENSIONS {
        return Err(ConfigError::Validation(format!(
            "embedding dimensions must be between 1 and {}, got {}",
            MAX_DIMENSIONS, config.dimensions
        )));
    }

    if config.provider == EmbeddingProvider::OpenAi {
        if config.model.trim().is_empty() {
            return Err(ConfigError::Validation(
                "embedding model cannot be empty".to_string(),
            ));
        }

        Url::parse(&config.endpoint).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid embedding endpoint: {}", e))
        })?;

        if config.api_key_env.trim().is_empty() {
            return Err(ConfigError::Validation(
                "api-key-env cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.output_dir.is_empty() {
        return Err(ConfigError::Validation(
            "output-dir cannot be empty".to_string(),
        ));
    }

    if config.documents_file.is_empty() {
        return Err(ConfigError::Validation(
            "documents-file cannot be empty".to_string(),
        ));
    }

    if config.log_file.is_empty() {
        return Err(ConfigError::Validation(
            "log-file cannot be empty".to_string(),
        ));
    }

    Ok(())
}
