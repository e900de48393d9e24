//! Error types for the memory store.
//!
//! Lookup failures are caller errors; persistence failures are server
//! errors and always carry the record that failed to write.

/// Errors that can occur while loading, mutating, or persisting records.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// The manifest, a record file, or the memory configuration is malformed.
    #[error("config error: {0}")]
    Config(String),

    /// No record with this name is declared in the manifest.
    #[error("record not found: {0}")]
    RecordNotFound(String),

    /// The record holds no item with this name.
    #[error("item '{item}' not found in record '{record}'")]
    ItemNotFound {
        /// The record that was searched.
        record: String,
        /// The item name that was not found.
        item: String,
    },

    /// The record already holds an item with this name.
    #[error("item '{item}' already exists in record '{record}'")]
    DuplicateItem {
        /// The record that was modified.
        record: String,
        /// The conflicting item name.
        item: String,
    },

    /// Writing a record file failed.
    #[error("failed to persist record '{record}': {source}")]
    Io {
        /// The record whose file could not be written.
        record: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Encoding a record as JSON failed.
    #[error("failed to encode record '{record}': {source}")]
    Encode {
        /// The record that could not be encoded.
        record: String,
        /// The underlying serde error.
        source: serde_json::Error,
    },

    /// The tokenizer could not be initialized.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// Several steps of a composite update failed.
    #[error("{} update step(s) failed: {}", .failures.len(), summarize(.failures))]
    Update {
        /// Every failure, in the order the steps ran.
        failures: Vec<MemoryError>,
    },
}

impl MemoryError {
    /// Fold the failures of a composite update into one result.
    ///
    /// A single failure is returned as-is so callers can match on it.
    pub fn collect(mut failures: Vec<Self>) -> Result<(), Self> {
        match failures.len() {
            0 => Ok(()),
            1 => Err(failures.remove(0)),
            _ => Err(Self::Update { failures }),
        }
    }

    /// Whether the failure was caused by the caller naming something that
    /// does not exist, as opposed to the store failing.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::RecordNotFound(_) | Self::ItemNotFound { .. } => true,
            Self::Update { failures } => failures.iter().all(Self::is_not_found),
            _ => false,
        }
    }

    /// Whether the failure is a conflict with existing content.
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::DuplicateItem { .. })
    }
}

fn summarize(failures: &[MemoryError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
