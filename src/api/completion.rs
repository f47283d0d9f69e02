use crate::api::retry::{with_retry, RetryConfig};
use crate::error::CompletionError;
use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "text-davinci-002";
pub const DEFAULT_MAX_TOKENS: u32 = 150;
pub const DEFAULT_FALLBACK_REPLY: &str = "Sorry, I can't answer your question right now.";

/// A remote text-completion service.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Validate a completion body and return the first choice, trimmed.
pub(crate) fn parse_completion(body: &str) -> Result<String, CompletionError> {
    let data: CompletionResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::Decode(e.to_string()))?;
    data.choices
        .into_iter()
        .next()
        .map(|c| c.text.trim().to_string())
        .ok_or(CompletionError::EmptyChoices)
}

/// Prefer the provider's own error message over the raw body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse { error }) => error.message,
        Err(_) => body.to_string(),
    }
}

pub struct OpenAiBackend {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    settings: CompletionSettings,
}

impl OpenAiBackend {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        settings: CompletionSettings,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            settings,
        })
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingCredential)?;

        let request = CompletionRequest {
            model: &self.settings.model,
            prompt,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let response = self
            .client
            .post(format!("{}/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: error_message(&body),
            });
        }

        parse_completion(&body)
    }
}

/// Prompt in, text out. Failures never reach the caller of [`complete`];
/// they are logged and replaced with the fallback reply.
///
/// [`complete`]: AiTextClient::complete
pub struct AiTextClient {
    backend: Box<dyn CompletionBackend>,
    retry: RetryConfig,
    fallback: String,
}

impl AiTextClient {
    pub fn new(backend: Box<dyn CompletionBackend>, retry: RetryConfig) -> Self {
        Self {
            backend,
            retry,
            fallback: DEFAULT_FALLBACK_REPLY.to_string(),
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub async fn try_complete(&self, prompt: &str) -> Result<String, CompletionError> {
        info!("Requesting completion ({} chars)", prompt.chars().count());
        with_retry(
            &self.retry,
            "Completion request",
            CompletionError::is_retryable,
            || self.backend.complete(prompt),
        )
        .await
    }

    pub async fn complete(&self, prompt: &str) -> String {
        match self.try_complete(prompt).await {
            Ok(text) => text,
            Err(e) => {
                error!("AI response error: {}", e);
                self.fallback.clone()
            }
        }
    }
}
