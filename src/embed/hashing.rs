//! Local feature-hashing embedder
//!
//! Maps unigrams and bigrams of lowercase alphanumeric tokens into a fixed
//! number of buckets with signed SHA-256 hashing, then L2-normalizes. Texts
//! sharing vocabulary end up with a high cosine similarity, which is enough
//! for deduplication and coarse retrieval without downloading a model.

use crate::embed::{EmbedError, Embedder};
use async_trait::async_trait;
use sha2::{Digest, Sha256};

/// Weight of a bigram feature relative to a unigram
const BIGRAM_WEIGHT: f32 = 0.5;

/// Deterministic, dependency-free embedder with a fixed output dimension
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    /// Creates an embedder producing vectors of `dimensions` floats
    ///
    /// `dimensions` is clamped to at least 1.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    /// Embeds a single text
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        let tokens: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .map(str::to_lowercase)
            .collect();

        for token in &tokens {
            self.add_feature(&mut vector, token.as_bytes(), 1.0);
        }

        for pair in tokens.windows(2) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            self.add_feature(&mut vector, bigram.as_bytes(), BIGRAM_WEIGHT);
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }

        vector
    }

    fn add_feature(&self, vector: &mut [f32], feature: &[u8], weight: f32) {
        let digest = Sha256::digest(feature);

        let mut bucket_bytes = [0u8; 8];
        bucket_bytes.copy_from_slice(&digest[..8]);
        let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimensions as u64) as usize;

        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, chunks: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(chunks.iter().map(|chunk| self.embed_text(chunk)).collect())
    }
}
