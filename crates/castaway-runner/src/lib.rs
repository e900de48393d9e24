//! Decision runner for the Castaway survival agent.
//!
//! Turns the rendered memory into one LLM completion and validates the
//! answer into a [`castaway_types::DecisionResult`].
//!
//! # Modules
//!
//! - [`config`] -- Environment-driven backend and strategy configuration
//! - [`decision`] -- [`Decider`]: one prompt, one completion, sentinel recovery
//! - [`error`] -- [`RunnerError`] taxonomy
//! - [`llm`] -- `OpenAI`-compatible and Anthropic backends
//! - [`parse`] -- Response validation
//! - [`prompt`] -- `minijinja` prompt templates

pub mod config;
pub mod decision;
pub mod error;
pub mod llm;
pub mod parse;
pub mod prompt;

pub use config::{BackendType, DecisionStrategy, LlmBackendConfig, RunnerConfig};
pub use decision::Decider;
pub use error::RunnerError;
pub use prompt::{PromptEngine, RenderedPrompt};
