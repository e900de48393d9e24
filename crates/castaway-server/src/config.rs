//! Service configuration.
//!
//! The canonical configuration lives in `castaway.yaml` (path overridable
//! with `CASTAWAY_CONFIG`). Every section has defaults, so a missing file
//! yields a working setup reading records from `./data`. LLM settings are
//! not here: they come from the environment, see
//! [`castaway_runner::RunnerConfig`].

use std::path::{Path, PathBuf};

use castaway_memory::MemoryConfig;
use serde::Deserialize;
use tracing::info;

use crate::server::ServerConfig;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "castaway.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override holds an unusable value.
    #[error("invalid environment override {name}: {message}")]
    Env {
        /// The variable name.
        name: String,
        /// What is wrong with it.
        message: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level service configuration, mirroring `castaway.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CastawayConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Where records live on disk.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Memory tunables.
    #[serde(default)]
    pub memory: MemoryConfig,
}

/// Record storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the manifest and one JSON file per record.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Manifest file name inside `data_dir`.
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Message feed file name inside `data_dir`.
    #[serde(default = "default_messages")]
    pub messages: String,

    /// Token encoding used for memory size logging.
    #[serde(default = "default_token_encoding")]
    pub token_encoding: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            manifest: default_manifest(),
            messages: default_messages(),
            token_encoding: default_token_encoding(),
        }
    }
}

impl StorageConfig {
    /// Full path of the manifest file.
    pub fn manifest_path(&self) -> PathBuf {
        self.data_dir.join(&self.manifest)
    }

    /// Full path of the message feed file.
    pub fn messages_path(&self) -> PathBuf {
        self.data_dir.join(&self.messages)
    }
}

impl CastawayConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if it is not valid YAML of this shape.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            info!(path = %path.display(), "loading configuration");
            Self::from_file(path)
        } else {
            info!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply environment overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides through an arbitrary variable lookup.
    ///
    /// - `CASTAWAY_DATA_DIR` replaces `storage.data_dir`
    /// - `CASTAWAY_HOST` replaces `server.host`
    /// - `CASTAWAY_PORT` replaces `server.port`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("CASTAWAY_DATA_DIR").filter(|v| !v.is_empty()) {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(host) = lookup("CASTAWAY_HOST").filter(|v| !v.is_empty()) {
            self.server.host = host;
        }
        if let Some(port) = lookup("CASTAWAY_PORT").filter(|v| !v.is_empty()) {
            self.server.port = port.parse().map_err(|e| ConfigError::Env {
                name: "CASTAWAY_PORT".to_owned(),
                message: format!("{e}"),
            })?;
        }
        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_manifest() -> String {
    "memory.json".to_owned()
}

fn default_messages() -> String {
    "messages.json".to_owned()
}

fn default_token_encoding() -> String {
    "cl100k_base".to_owned()
}
