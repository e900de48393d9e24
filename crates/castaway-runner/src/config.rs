//! Configuration for the decision runner.
//!
//! All configuration comes from environment variables. Parsing goes through
//! a lookup function so it can be exercised without touching the process
//! environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::RunnerError;

/// Complete runner configuration.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// The LLM backend to ask.
    pub backend: LlmBackendConfig,
    /// How decisions are made.
    pub strategy: DecisionStrategy,
    /// Deadline for one completion call. `None` waits indefinitely.
    pub decision_timeout: Option<Duration>,
    /// Directory holding `system.j2` and `instruction.j2` overrides.
    /// `None` uses the built-in templates.
    pub templates_dir: Option<PathBuf>,
}

/// Configuration for a single LLM backend.
#[derive(Debug, Clone)]
pub struct LlmBackendConfig {
    /// Wire protocol spoken by the backend.
    pub backend_type: BackendType,
    /// Provider name as configured, for logging.
    pub provider: String,
    /// Base API URL (e.g. `https://api.openai.com/v1`).
    pub api_url: String,
    /// API key for authentication. May be empty for local servers.
    pub api_key: String,
    /// Model identifier (e.g. `gpt-4o`).
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on completion length.
    pub max_tokens: u32,
}

/// Supported LLM wire protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// `OpenAI`-compatible chat completions (`OpenAI`, Groq, Ollama, `DeepSeek`).
    OpenAi,
    /// Anthropic Messages API.
    Anthropic,
}

/// Decision strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionStrategy {
    /// One completion per decision, memory as context, JSON answer.
    ZeroShot,
}

/// Per-provider defaults.
struct Provider {
    backend_type: BackendType,
    api_url: &'static str,
    key_var: Option<&'static str>,
    default_model: Option<&'static str>,
}

fn provider(name: &str) -> Result<Provider, RunnerError> {
    let provider = match name {
        "openai" => Provider {
            backend_type: BackendType::OpenAi,
            api_url: "https://api.openai.com/v1",
            key_var: Some("OPENAI_API_KEY"),
            default_model: Some("gpt-4o"),
        },
        "groq" => Provider {
            backend_type: BackendType::OpenAi,
            api_url: "https://api.groq.com/openai/v1",
            key_var: Some("GROQ_API_KEY"),
            default_model: Some("llama3-70b-8192"),
        },
        "deepseek" => Provider {
            backend_type: BackendType::OpenAi,
            api_url: "https://api.deepseek.com/v1",
            key_var: Some("DEEPSEEK_API_KEY"),
            default_model: Some("deepseek-chat"),
        },
        "ollama" => Provider {
            backend_type: BackendType::OpenAi,
            api_url: "http://localhost:11434/v1",
            key_var: None,
            default_model: None,
        },
        "anthropic" | "claude" => Provider {
            backend_type: BackendType::Anthropic,
            api_url: "https://api.anthropic.com/v1",
            key_var: Some("ANTHROPIC_API_KEY"),
            default_model: None,
        },
        other => {
            return Err(RunnerError::Config(format!("unknown backend type: {other}")));
        }
    };
    Ok(provider)
}

impl RunnerConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables (all optional unless noted):
    /// - `LLM_BACKEND` -- `openai` (default), `groq`, `deepseek`, `ollama`, `anthropic`
    /// - `LLM_API_URL` -- base API URL (provider default)
    /// - `LLM_API_KEY` -- API key; falls back to the provider key variable
    ///   (`OPENAI_API_KEY`, `GROQ_API_KEY`, ...). Required except for Ollama.
    /// - `LLM_MODEL` -- model name (provider default; required for Ollama
    ///   and Anthropic)
    /// - `LLM_TEMPERATURE` -- sampling temperature (default 0.2)
    /// - `LLM_MAX_TOKENS` -- completion bound (default 512)
    /// - `DECISION_STRATEGY` -- `zeroshot` (default)
    /// - `DECISION_TIMEOUT_MS` -- completion deadline in milliseconds (unset: none)
    /// - `TEMPLATES_DIR` -- prompt template overrides (unset: built-in)
    pub fn from_env() -> Result<Self, RunnerError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RunnerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let provider_name = var("LLM_BACKEND")
            .unwrap_or_else(|| "openai".to_owned())
            .to_lowercase();
        let defaults = provider(&provider_name)?;

        let api_url = var("LLM_API_URL")
            .unwrap_or_else(|| defaults.api_url.to_owned())
            .trim_end_matches('/')
            .to_owned();

        let api_key = match (var("LLM_API_KEY"), defaults.key_var) {
            (Some(key), _) => key,
            (None, Some(key_var)) => var(key_var).ok_or_else(|| {
                RunnerError::Config(format!(
                    "missing API key for {provider_name}: set LLM_API_KEY or {key_var}"
                ))
            })?,
            (None, None) => String::new(),
        };

        let model = var("LLM_MODEL")
            .or_else(|| defaults.default_model.map(ToOwned::to_owned))
            .ok_or_else(|| {
                RunnerError::Config(format!("LLM_MODEL is required for {provider_name}"))
            })?;

        let temperature: f32 = var("LLM_TEMPERATURE")
            .unwrap_or_else(|| "0.2".to_owned())
            .parse()
            .map_err(|e| RunnerError::Config(format!("invalid LLM_TEMPERATURE: {e}")))?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(RunnerError::Config(format!(
                "LLM_TEMPERATURE must be within 0..=2, got {temperature}"
            )));
        }

        let max_tokens: u32 = var("LLM_MAX_TOKENS")
            .unwrap_or_else(|| "512".to_owned())
            .parse()
            .map_err(|e| RunnerError::Config(format!("invalid LLM_MAX_TOKENS: {e}")))?;

        let strategy = match var("DECISION_STRATEGY")
            .unwrap_or_else(|| "zeroshot".to_owned())
            .to_lowercase()
            .as_str()
        {
            "zeroshot" | "zero_shot" | "zero-shot" => DecisionStrategy::ZeroShot,
            "agentic" => {
                return Err(RunnerError::Config(
                    "DECISION_STRATEGY=agentic is not supported, use zeroshot".to_owned(),
                ));
            }
            other => {
                return Err(RunnerError::Config(format!(
                    "unknown DECISION_STRATEGY: {other}"
                )));
            }
        };

        let decision_timeout = var("DECISION_TIMEOUT_MS")
            .map(|raw| {
                raw.parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|e| RunnerError::Config(format!("invalid DECISION_TIMEOUT_MS: {e}")))
            })
            .transpose()?;

        let templates_dir = var("TEMPLATES_DIR").map(PathBuf::from);

        Ok(Self {
            backend: LlmBackendConfig {
                backend_type: defaults.backend_type,
                provider: provider_name,
                api_url,
                api_key,
                model,
                temperature,
                max_tokens,
            },
            strategy,
            decision_timeout,
            templates_dir,
        })
    }
}
