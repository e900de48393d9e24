//! The decision cycle.
//!
//! One call renders the prompt, makes exactly one completion request and
//! validates the answer. There are no retries. Every failure is logged with
//! its context and replaced by a sentinel [`DecisionResult`], so callers
//! always receive a well-formed pair and treat an empty action as "no
//! decision made".

use std::time::{Duration, Instant};

use castaway_types::DecisionResult;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::config::RunnerConfig;
use crate::error::RunnerError;
use crate::llm::{LlmBackend, create_backend};
use crate::parse::validate_completion;
use crate::prompt::PromptEngine;

/// Asks the model for the next action.
pub struct Decider {
    backend: LlmBackend,
    prompts: PromptEngine,
    deadline: Option<Duration>,
}

impl Decider {
    /// Assemble a decider from its parts.
    pub const fn new(backend: LlmBackend, prompts: PromptEngine, deadline: Option<Duration>) -> Self {
        Self {
            backend,
            prompts,
            deadline,
        }
    }

    /// Build the backend and templates described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Template`] if the templates cannot be loaded.
    pub fn from_config(config: &RunnerConfig) -> Result<Self, RunnerError> {
        let prompts = match &config.templates_dir {
            Some(dir) => PromptEngine::from_dir(dir)?,
            None => PromptEngine::builtin()?,
        };
        let backend = create_backend(&config.backend);

        info!(
            backend = backend.name(),
            provider = %config.backend.provider,
            model = backend.model(),
            strategy = ?config.strategy,
            deadline = ?config.decision_timeout,
            "decider ready"
        );

        Ok(Self::new(backend, prompts, config.decision_timeout))
    }

    /// Ask the model for the next action given the rendered memory.
    ///
    /// Never fails: schema violations yield the validation sentinel, any
    /// other failure the fetch sentinel.
    pub async fn next_action(&self, memory: &str, actions: &[String]) -> DecisionResult {
        let started = Instant::now();
        match self.decide(memory, actions).await {
            Ok(result) => {
                info!(
                    action = %result.action,
                    observation = %result.observation,
                    elapsed_ms = started.elapsed().as_millis(),
                    "decision made"
                );
                result
            }
            Err(e) => {
                error!(
                    error = %e,
                    backend = self.backend.name(),
                    model = self.backend.model(),
                    elapsed_ms = started.elapsed().as_millis(),
                    "decision failed, returning sentinel"
                );
                recover(&e)
            }
        }
    }

    async fn decide(&self, memory: &str, actions: &[String]) -> Result<DecisionResult, RunnerError> {
        let prompt = self.prompts.render(memory, actions)?;

        let raw = match self.deadline {
            Some(limit) => timeout(limit, self.backend.complete(&prompt))
                .await
                .map_err(|_elapsed| RunnerError::Timeout(limit))??,
            None => self.backend.complete(&prompt).await?,
        };

        validate_completion(&raw).inspect_err(|e| {
            warn!(error = %e, raw_response = %raw, "model response rejected");
        })
    }
}

/// Map a decision failure to its sentinel result.
pub fn recover(error: &RunnerError) -> DecisionResult {
    match error {
        RunnerError::Validation(_) => DecisionResult::validation_error(),
        _ => DecisionResult::fetch_error(),
    }
}

#[cfg(test)]
mod tests {
    use castaway_types::decision::{FETCH_ERROR, VALIDATION_ERROR};

    use super::*;

    #[test]
    fn validation_maps_to_validation_sentinel() {
        let result = recover(&RunnerError::Validation("missing field".to_owned()));
        assert_eq!(result.action, "");
        assert_eq!(result.observation, VALIDATION_ERROR);
    }

    #[test]
    fn everything_else_maps_to_fetch_sentinel() {
        for error in [
            RunnerError::Parse("prose".to_owned()),
            RunnerError::LlmBackend("503".to_owned()),
            RunnerError::Template("bad".to_owned()),
            RunnerError::Timeout(Duration::from_millis(10)),
        ] {
            let result = recover(&error);
            assert!(result.is_no_decision());
            assert_eq!(result.observation, FETCH_ERROR);
        }
    }
}
