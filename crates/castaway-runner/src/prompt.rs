//! Prompt templates via `minijinja`.
//!
//! The system message is the rendered memory. The user message is the
//! instruction: the list of known actions and the JSON shape the answer must
//! take. Both templates ship built in; a directory holding `system.j2` and
//! `instruction.j2` overrides them.

use std::path::Path;

use minijinja::Environment;

use crate::error::RunnerError;

const SYSTEM_TEMPLATE: &str = include_str!("../templates/system.j2");

const INSTRUCTION_TEMPLATE: &str = include_str!("../templates/instruction.j2");

/// The complete rendered prompt ready to send to an LLM backend.
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    /// System message: the memory text.
    pub system: String,
    /// User message: the instruction.
    pub user: String,
}

/// Holds the two prompt templates.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    /// Engine with the built-in templates.
    pub fn builtin() -> Result<Self, RunnerError> {
        Self::from_sources(SYSTEM_TEMPLATE.to_owned(), INSTRUCTION_TEMPLATE.to_owned())
    }

    /// Engine with templates read from `dir/system.j2` and
    /// `dir/instruction.j2`.
    pub fn from_dir(dir: &Path) -> Result<Self, RunnerError> {
        let system = load_template(dir, "system.j2")?;
        let instruction = load_template(dir, "instruction.j2")?;
        Self::from_sources(system, instruction)
    }

    fn from_sources(system: String, instruction: String) -> Result<Self, RunnerError> {
        let mut env = Environment::new();
        env.add_template_owned("system", system)
            .map_err(|e| RunnerError::Template(format!("failed to add system template: {e}")))?;
        env.add_template_owned("instruction", instruction).map_err(|e| {
            RunnerError::Template(format!("failed to add instruction template: {e}"))
        })?;
        Ok(Self { env })
    }

    /// Render both messages for one decision.
    pub fn render(&self, memory: &str, actions: &[String]) -> Result<RenderedPrompt, RunnerError> {
        let ctx = serde_json::json!({
            "memory": memory,
            "actions": actions,
        });

        let system = self
            .env
            .get_template("system")
            .map_err(|e| RunnerError::Template(format!("missing system template: {e}")))?
            .render(&ctx)
            .map_err(|e| RunnerError::Template(format!("system render failed: {e}")))?;

        let user = self
            .env
            .get_template("instruction")
            .map_err(|e| RunnerError::Template(format!("missing instruction template: {e}")))?
            .render(&ctx)
            .map_err(|e| RunnerError::Template(format!("instruction render failed: {e}")))?;

        Ok(RenderedPrompt { system, user })
    }
}

fn load_template(dir: &Path, filename: &str) -> Result<String, RunnerError> {
    let path = dir.join(filename);
    std::fs::read_to_string(&path)
        .map_err(|e| RunnerError::Template(format!("failed to read {}: {e}", path.display())))
}
