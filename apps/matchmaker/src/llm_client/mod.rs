/// LLM Client: the single point of entry for every completion call in the service.
///
/// ARCHITECTURAL RULE: no other module talks to the completion API directly.
/// The analysis pipeline only sees the `CompletionService` trait.
///
/// Speaks the OpenAI-compatible chat-completions protocol (Groq by default).
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const MAX_TOKENS: u32 = 4096;
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM call timed out after {0:?}")]
    Timeout(Duration),
}

/// Text in, text out. Implementations may fail; callers decide whether a
/// failure skips work or aborts it.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, if any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Chat-completions client with retry logic.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(base_url: String, api_key: String, model: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a raw call, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: 0.2,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let url = format!("{}/chat/completions", self.base_url);
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let chat_response: ChatResponse = response.json().await?;

            if let Some(usage) = &chat_response.usage {
                debug!(
                    "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }

            return Ok(chat_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self.call(prompt, prompts::RECRUITER_SYSTEM).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}
