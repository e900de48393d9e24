//! Wiring configuration into application state.

use castaway_memory::{MemoryError, RecordStore, TokenCounter};
use castaway_runner::{Decider, RunnerConfig, RunnerError};
use tracing::info;

use crate::config::{CastawayConfig, ConfigError};
use crate::server::ServerError;
use crate::state::AppState;

/// Errors that can stop the service from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The configuration file or an override is invalid.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The record store could not be loaded.
    #[error("memory error: {source}")]
    Memory {
        /// The underlying memory error.
        #[from]
        source: MemoryError,
    },

    /// The decision runner could not be configured.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: RunnerError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: ServerError,
    },
}

/// Load the record store, tokenizer and decider described by the
/// configuration.
///
/// # Errors
///
/// Returns [`StartupError::Memory`] if the records cannot be loaded or the
/// tokenizer is unknown, and [`StartupError::Runner`] if the prompt
/// templates cannot be loaded.
pub fn build_state(config: &CastawayConfig, runner: &RunnerConfig) -> Result<AppState, StartupError> {
    let storage = &config.storage;
    let store = RecordStore::load(
        &storage.manifest_path(),
        storage.data_dir.clone(),
        config.memory.clone(),
    )?;
    let tokens = TokenCounter::new(&storage.token_encoding)?;
    let decider = Decider::from_config(runner)?;

    info!(
        data_dir = %storage.data_dir.display(),
        records = store.records().count(),
        actions = store.action_names().len(),
        encoding = tokens.encoding(),
        "application state ready"
    );

    Ok(AppState::new(store, decider, tokens, storage.messages_path()))
}
