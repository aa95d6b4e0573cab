//! Text embedding backends.
//!
//! The ranker only sees the `Embedder` trait. `OllamaEmbedder` calls a local
//! Ollama server; `HashEmbedder` is a deterministic offline fallback used in
//! tests and when no model server is available.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_EMBED_MODEL: &str = "all-minilm";
/// Output width of all-MiniLM-L6-v2.
pub const DEFAULT_DIMENSION: usize = 384;
const EMBED_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embedding API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Expected {expected} embeddings, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Embedding backend returned no vector")]
    Empty,
}

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.encode_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or(EmbeddingError::Empty)
    }

    /// One vector per input, in input order.
    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Embeddings from an Ollama server (`POST {base}/api/embed`).
#[derive(Clone)]
pub struct OllamaEmbedder {
    client: Client,
    base_url: String,
    model: String,
    dimension: usize,
}

impl OllamaEmbedder {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            dimension: DEFAULT_DIMENSION,
        }
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let start = Instant::now();
        let response = self
            .client
            .post(format!("{}/api/embed", self.base_url))
            .timeout(EMBED_TIMEOUT)
            .json(&EmbedRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let result: EmbedResponse = response.json().await?;
        if result.embeddings.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: result.embeddings.len(),
            });
        }

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            result_count = result.embeddings.len(),
            duration_ms = elapsed,
            "Embedding complete"
        );
        if elapsed > 5000 {
            warn!(
                duration_ms = elapsed,
                input_count = texts.len(),
                "Slow embedding operation"
            );
        }

        Ok(result.embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Deterministic bag-of-words embedder built on feature hashing.
///
/// Tokens are lowercased alphanumeric runs. Each token adds a signed unit to
/// one bucket; the result is L2-normalized. Changing the hashing scheme changes
/// every vector.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn bucket(&self, token: &str) -> (usize, f32) {
        let digest = Sha256::digest(token.as_bytes());
        let mut index = [0u8; 8];
        index.copy_from_slice(&digest[..8]);
        let idx = (u64::from_le_bytes(index) % self.dimension as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        (idx, sign)
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let (idx, sign) = self.bucket(&token.to_lowercase());
            vector[idx] += sign;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.embed(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "feature-hash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_embedding_is_deterministic_and_normalized() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed("Desenvolvedor Rust sênior");
        let b = embedder.embed("desenvolvedor   RUST sênior");
        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_DIMENSION);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hash_embedding_of_empty_text_is_zero() {
        let v = HashEmbedder::new(16).embed("  ");
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_zero_dimension_is_clamped() {
        assert_eq!(HashEmbedder::new(0).dimension(), 1);
    }

    #[tokio::test]
    async fn test_encode_uses_batch_path() {
        let embedder = HashEmbedder::new(32);
        let single = embedder.encode("java spring").await.unwrap();
        assert_eq!(single, embedder.embed("java spring"));
    }

    #[test]
    fn test_embed_response_decodes() {
        let json = r#"{"model":"all-minilm","embeddings":[[0.1,0.2],[0.3,0.4]]}"#;
        let response: EmbedResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.embeddings.len(), 2);
    }
}
