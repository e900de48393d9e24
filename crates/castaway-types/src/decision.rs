//! The decision returned to the caller.
//!
//! The canonical wire shape is `{"action": ..., "observation": ...}`.
//! When no decision could be made the action is empty and the observation
//! carries one of two fixed sentinel strings.

use serde::{Deserialize, Serialize};

/// Observation used when the model answered with JSON of the wrong shape.
pub const VALIDATION_ERROR: &str = "Validation error";

/// Observation used when the model could not be reached or did not answer
/// with JSON at all.
pub const FETCH_ERROR: &str = "Error fetching next action";

/// The next action chosen by the model and its short justification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionResult {
    /// Name of the chosen action; empty when no decision was made.
    pub action: String,
    /// Short free-text justification.
    pub observation: String,
}

impl DecisionResult {
    /// Create a decision.
    pub fn new(action: impl Into<String>, observation: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            observation: observation.into(),
        }
    }

    /// Sentinel for a model response that failed schema validation.
    pub fn validation_error() -> Self {
        Self::new("", VALIDATION_ERROR)
    }

    /// Sentinel for any other decision failure.
    pub fn fetch_error() -> Self {
        Self::new("", FETCH_ERROR)
    }

    /// Whether this result means "no decision made".
    pub fn is_no_decision(&self) -> bool {
        self.action.is_empty()
    }
}
