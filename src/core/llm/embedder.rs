//! Text embedding capability and the Ollama client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::config::ModelsConfig;
use crate::core::error::{Result, StrataError};

/// Turns text into embedding vectors
///
/// Implementations must be deterministic for identical input within one
/// model version.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed many texts, returning one vector per input in order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Model identifier reported in stats
    fn model_name(&self) -> &str;
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Embedder backed by a local Ollama instance (`POST /api/embed`)
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(config: &ModelsConfig) -> Result<Self> {
        Ok(Self {
            client: super::http_client(config)?,
            url: config.ollama_url.trim_end_matches('/').to_string(),
            model: config.embedding_model.clone(),
        })
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| StrataError::Embedding("Ollama returned no embedding".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(format!("{}/api/embed", self.url))
            .json(&EmbedRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await
            .map_err(|e| {
                StrataError::Embedding(format!(
                    "Ollama connection error (is Ollama running at {}?): {e}",
                    self.url
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StrataError::Embedding(format!(
                "Ollama API error {status}: {body}"
            )));
        }

        let parsed: EmbedResponse = response.json().await.map_err(|e| {
            StrataError::Embedding(format!("Invalid Ollama embed response: {e}"))
        })?;

        if parsed.embeddings.len() != texts.len() {
            return Err(StrataError::Embedding(format!(
                "Requested {} embeddings, Ollama returned {}",
                texts.len(),
                parsed.embeddings.len()
            )));
        }

        tracing::debug!("Embedded {} texts with {}", texts.len(), self.model);
        Ok(parsed.embeddings)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
