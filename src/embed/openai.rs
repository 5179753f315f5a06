//! OpenAI-compatible embedding client

use crate::embed::{EmbedError, Embedder};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Embeddings client that talks to `<endpoint>/embeddings`
#[derive(Debug, Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    url: String,
    model: String,
    dimensions: usize,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    dimensions: usize,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbedder {
    /// Builds a client for an OpenAI-compatible embeddings endpoint
    ///
    /// # Arguments
    ///
    /// * `api_key` - Bearer token
    /// * `endpoint` - Base URL such as `https://api.openai.com/v1`
    /// * `model` - Embedding model name
    /// * `dimensions` - Requested (and enforced) vector length
    /// * `timeout` - Timeout for each embedding request
    pub fn new(
        api_key: &str,
        endpoint: &str,
        model: &str,
        dimensions: usize,
        timeout: Duration,
    ) -> Result<Self, EmbedError> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
            .map_err(|_| EmbedError::InvalidApiKey)?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            url: format!("{}/embeddings", endpoint.trim_end_matches('/')),
            model: model.to_string(),
            dimensions,
        })
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, chunks: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: chunks,
            dimensions: self.dimensions,
        };

        let response = self.client.post(&self.url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(EmbedError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let mut parsed: EmbeddingResponse = response.json().await?;
        if parsed.data.len() != chunks.len() {
            return Err(EmbedError::CountMismatch {
                expected: chunks.len(),
                actual: parsed.data.len(),
            });
        }

        parsed.data.sort_by_key(|entry| entry.index);

        if let Some(bad) = parsed
            .data
            .iter()
            .find(|entry| entry.embedding.len() != self.dimensions)
        {
            return Err(EmbedError::DimensionMismatch {
                expected: self.dimensions,
                actual: bad.embedding.len(),
            });
        }

        Ok(parsed.data.into_iter().map(|entry| entry.embedding).collect())
    }
}
