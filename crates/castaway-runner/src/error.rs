//! Error types for the decision runner.
//!
//! None of these reach the caller of [`crate::Decider::next_action`]: every
//! failure is logged and folded into one of the two sentinel results.
//! [`RunnerError::Validation`] maps to the validation sentinel, everything
//! else to the fetch sentinel.

use std::time::Duration;

/// Errors that can occur while producing a decision.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Failed to load or render a prompt template.
    #[error("template render error: {0}")]
    Template(String),

    /// An LLM backend returned an error or was unreachable.
    #[error("LLM backend error: {0}")]
    LlmBackend(String),

    /// The model answered with text that is not JSON.
    #[error("response parse error: {0}")]
    Parse(String),

    /// The model answered with JSON of the wrong shape.
    #[error("response validation error: {0}")]
    Validation(String),

    /// The decision deadline was exceeded.
    #[error("timeout: decision exceeded {0:?} deadline")]
    Timeout(Duration),

    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),
}
