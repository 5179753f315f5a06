//! Embedding providers for text chunks
//!
//! The crawl engine only sees the [`Embedder`] capability. Which provider sits
//! behind it is decided once, when the engine is built: [`NoopEmbedder`] when
//! vectorization is off, otherwise the provider named in the configuration.
//! Providers are loaded once and shared by all workers, so they must be safe
//! for concurrent use through `&self`.

mod hashing;
mod openai;

pub use hashing::HashingEmbedder;
pub use openai::OpenAiEmbedder;

use crate::config::{EmbeddingConfig, EmbeddingProvider};
use crate::output::ChunkRecord;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while computing embeddings
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("Environment variable {0} with the embedding API key is not set")]
    MissingApiKey(String),

    #[error("Embedding API key contains characters not allowed in a header")]
    InvalidApiKey,

    #[error("Embedding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embedding API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Expected {expected} embeddings, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Expected vectors of dimension {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Computes one vector per text chunk
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Length of every vector this provider returns
    fn dimensions(&self) -> usize;

    /// Embeds all chunks of one page in a single batch
    ///
    /// The result is order-preserving: `result[i]` belongs to `chunks[i]`.
    async fn embed(&self, chunks: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;
}

/// Provider used when vectorization is disabled; returns no vectors
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEmbedder;

#[async_trait]
impl Embedder for NoopEmbedder {
    fn dimensions(&self) -> usize {
        0
    }

    async fn embed(&self, _chunks: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(Vec::new())
    }
}

/// Loads the provider selected by `config`
///
/// # Returns
///
/// * `Ok(Arc<dyn Embedder>)` - Provider ready to be shared by workers
/// * `Err(EmbedError)` - Provider could not be set up (e.g. missing API key)
pub fn build_embedder(
    config: &EmbeddingConfig,
    timeout: Duration,
) -> Result<Arc<dyn Embedder>, EmbedError> {
    match config.provider {
        EmbeddingProvider::Hashing => Ok(Arc::new(HashingEmbedder::new(config.dimensions))),
        EmbeddingProvider::OpenAi => {
            let api_key = std::env::var(&config.api_key_env)
                .ok()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| EmbedError::MissingApiKey(config.api_key_env.clone()))?;

            let embedder = OpenAiEmbedder::new(
                &api_key,
                &config.endpoint,
                &config.model,
                config.dimensions,
                timeout,
            )?;
            Ok(Arc::new(embedder))
        }
    }
}

/// Pairs chunk texts with their vectors
///
/// An empty `vectors` list (no-op provider) leaves every chunk without a
/// vector; otherwise there must be exactly one vector per chunk.
pub fn attach_vectors(
    chunks: Vec<String>,
    vectors: Vec<Vec<f32>>,
) -> Result<Vec<ChunkRecord>, EmbedError> {
    if vectors.is_empty() {
        return Ok(chunks
            .into_iter()
            .map(|text| ChunkRecord { text, vector: None })
            .collect());
    }

    if vectors.len() != chunks.len() {
        return Err(EmbedError::CountMismatch {
            expected: chunks.len(),
            actual: vectors.len(),
        });
    }

    Ok(chunks
        .into_iter()
        .zip(vectors)
        .map(|(text, vector)| ChunkRecord {
            text,
            vector: Some(vector),
        })
        .collect())
}
