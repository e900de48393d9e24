//! Castaway decision service binary.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load `castaway.yaml` (or `CASTAWAY_CONFIG`) and apply env overrides
//! 3. Load LLM settings from the environment
//! 4. Load the record store, tokenizer and decider
//! 5. Serve HTTP until Ctrl-C

use std::path::PathBuf;
use std::sync::Arc;

use castaway_runner::RunnerConfig;
use castaway_server::config::DEFAULT_CONFIG_FILE;
use castaway_server::{CastawayConfig, StartupError, build_state, start_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("castaway-server starting");

    run().await?;
    Ok(())
}

async fn run() -> Result<(), StartupError> {
    let config_path = std::env::var("CASTAWAY_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);
    let mut config = CastawayConfig::load(&config_path)?;
    config.apply_env_overrides()?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        data_dir = %config.storage.data_dir.display(),
        logs_size = config.memory.logs_size,
        "configuration loaded"
    );

    let runner = RunnerConfig::from_env()?;
    let state = Arc::new(build_state(&config, &runner)?);

    start_server(&config.server, state).await?;
    Ok(())
}
