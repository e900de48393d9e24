//! LLM backends.
//!
//! Enum dispatch over the two wire protocols the service speaks: `OpenAI`
//! compatible chat completions and the Anthropic Messages API. Each backend
//! sends one rendered prompt and returns the raw text of the answer; parsing
//! and validation happen in [`crate::parse`].

use crate::config::{BackendType, LlmBackendConfig};
use crate::error::RunnerError;
use crate::prompt::RenderedPrompt;

/// An LLM backend that can complete a prompt.
///
/// Enum dispatch stands in for a trait object since async methods are not
/// dyn-compatible.
pub enum LlmBackend {
    /// `OpenAI`-compatible chat completions API.
    OpenAi(OpenAiBackend),
    /// Anthropic Messages API.
    Anthropic(AnthropicBackend),
}

impl LlmBackend {
    /// Send a prompt and return the response text.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::LlmBackend`] if the HTTP call fails, the API
    /// answers with a non-success status, or the answer text cannot be
    /// located in the response body.
    pub async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, RunnerError> {
        match self {
            Self::OpenAi(backend) => backend.complete(prompt).await,
            Self::Anthropic(backend) => backend.complete(prompt).await,
        }
    }

    /// Protocol name for logging.
    pub const fn name(&self) -> &str {
        match self {
            Self::OpenAi(_) => "openai-compatible",
            Self::Anthropic(_) => "anthropic",
        }
    }

    /// Model identifier for logging.
    pub fn model(&self) -> &str {
        match self {
            Self::OpenAi(backend) => &backend.settings.model,
            Self::Anthropic(backend) => &backend.settings.model,
        }
    }
}

struct Settings {
    provider: String,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl Settings {
    fn from_config(config: &LlmBackendConfig) -> Self {
        Self {
            provider: config.provider.clone(),
            api_url: config.api_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// Backend for `OpenAI`-compatible chat completions APIs.
///
/// Sends requests to `{api_url}/chat/completions` asking for a JSON object
/// answer.
pub struct OpenAiBackend {
    client: reqwest::Client,
    settings: Settings,
}

impl OpenAiBackend {
    /// Create a new `OpenAI`-compatible backend.
    pub fn new(config: &LlmBackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings: Settings::from_config(config),
        }
    }

    async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, RunnerError> {
        let s = &self.settings;
        let url = format!("{}/chat/completions", s.api_url);

        let body = serde_json::json!({
            "model": s.model,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user}
            ],
            "temperature": s.temperature,
            "max_tokens": s.max_tokens,
            "response_format": {"type": "json_object"}
        });

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);
        if !s.api_key.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", s.api_key));
        }

        let response = request.send().await.map_err(|e| {
            RunnerError::LlmBackend(format!("{} request failed: {e}", s.provider))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(RunnerError::LlmBackend(format!(
                "{} returned {status}: {error_body}",
                s.provider
            )));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            RunnerError::LlmBackend(format!("{} response parse failed: {e}", s.provider))
        })?;

        extract_openai_content(&json)
    }
}

/// Extract the answer text from a chat completions response.
fn extract_openai_content(json: &serde_json::Value) -> Result<String, RunnerError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            RunnerError::LlmBackend("response missing choices[0].message.content".to_owned())
        })
}

/// Backend for the Anthropic Messages API.
///
/// The system prompt is a top-level field, authentication uses the
/// `x-api-key` header, and the answer lives at `content[0].text`.
pub struct AnthropicBackend {
    client: reqwest::Client,
    settings: Settings,
}

impl AnthropicBackend {
    /// Create a new Anthropic Messages API backend.
    pub fn new(config: &LlmBackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings: Settings::from_config(config),
        }
    }

    async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, RunnerError> {
        let s = &self.settings;
        let url = format!("{}/messages", s.api_url);

        let body = serde_json::json!({
            "model": s.model,
            "max_tokens": s.max_tokens,
            "temperature": s.temperature,
            "system": prompt.system,
            "messages": [
                {"role": "user", "content": prompt.user}
            ]
        });

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &s.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| RunnerError::LlmBackend(format!("Anthropic request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(RunnerError::LlmBackend(format!(
                "Anthropic returned {status}: {error_body}"
            )));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            RunnerError::LlmBackend(format!("Anthropic response parse failed: {e}"))
        })?;

        extract_anthropic_content(&json)
    }
}

/// Extract the answer text from a Messages API response.
fn extract_anthropic_content(json: &serde_json::Value) -> Result<String, RunnerError> {
    json.get("content")
        .and_then(|c| c.get(0))
        .and_then(|b| b.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            RunnerError::LlmBackend("Anthropic response missing content[0].text".to_owned())
        })
}

/// Create an LLM backend from configuration.
pub fn create_backend(config: &LlmBackendConfig) -> LlmBackend {
    match config.backend_type {
        BackendType::OpenAi => LlmBackend::OpenAi(OpenAiBackend::new(config)),
        BackendType::Anthropic => LlmBackend::Anthropic(AnthropicBackend::new(config)),
    }
}
