//! Text completion capability and the Ollama chat client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::config::ModelsConfig;
use crate::core::error::{Result, StrataError};

/// Produces a text completion for a filled prompt
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Model identifier reported in stats
    fn model_name(&self) -> &str;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: String,
}

/// Completer backed by Ollama's non-streaming `POST /api/chat`
#[derive(Debug, Clone)]
pub struct OllamaCompleter {
    client: reqwest::Client,
    url: String,
    model: String,
    temperature: f32,
}

impl OllamaCompleter {
    pub fn new(config: &ModelsConfig) -> Result<Self> {
        Ok(Self {
            client: super::http_client(config)?,
            url: config.ollama_url.trim_end_matches('/').to_string(),
            model: config.llm_model.clone(),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl Completer for OllamaCompleter {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                StrataError::Completion(format!(
                    "Ollama connection error (is Ollama running at {}?): {e}",
                    self.url
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StrataError::Completion(format!(
                "Ollama API error {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            StrataError::Completion(format!("Invalid Ollama chat response: {e}"))
        })?;

        Ok(parsed.message.content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
