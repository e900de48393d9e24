//! Record store: manifest loading, lookup, and per-record persistence.
//!
//! The manifest (`memory.json`) is a JSON array of `{name, description}`
//! entries. Each declared record lives in `<base_dir>/<name>.json` with the
//! shape `{"<name>": [item, ...]}`. A missing or empty record file is an
//! empty record. Manifest order is kept and is the rendering order.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use castaway_types::records::ACTIONS;
use castaway_types::{Item, RecordDescriptor, RecordKind};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::MemoryConfig;
use crate::error::MemoryError;

/// A named, described collection of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub(crate) name: String,
    pub(crate) description: String,
    #[serde(skip)]
    pub(crate) kind: RecordKind,
    pub(crate) items: Vec<Item>,
}

impl Record {
    /// Record name, as declared in the manifest.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Static description shown next to the record title.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Category derived from the record name.
    pub const fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// First item with the given name.
    pub fn find(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.name == name)
    }
}

/// The full set of records backing one game.
#[derive(Debug)]
pub struct RecordStore {
    base_dir: PathBuf,
    records: Vec<Record>,
    config: MemoryConfig,
}

impl RecordStore {
    /// Load the manifest and every record it declares.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::Config`] if the memory configuration is
    /// invalid, the manifest cannot be read or parsed, the manifest declares
    /// a record twice, or a record file is malformed. Returns
    /// [`MemoryError::Io`] if a record file exists but cannot be read.
    pub fn load(
        manifest_path: &Path,
        base_dir: impl Into<PathBuf>,
        config: MemoryConfig,
    ) -> Result<Self, MemoryError> {
        config.validate()?;
        let base_dir = base_dir.into();

        let raw = fs::read_to_string(manifest_path).map_err(|e| {
            MemoryError::Config(format!(
                "cannot read manifest {}: {e}",
                manifest_path.display()
            ))
        })?;
        let manifest: Vec<RecordDescriptor> = serde_json::from_str(&raw).map_err(|e| {
            MemoryError::Config(format!(
                "malformed manifest {}: {e}",
                manifest_path.display()
            ))
        })?;

        let mut records: Vec<Record> = Vec::with_capacity(manifest.len());
        for descriptor in manifest {
            if records.iter().any(|r| r.name == descriptor.name) {
                return Err(MemoryError::Config(format!(
                    "record declared twice in manifest: {}",
                    descriptor.name
                )));
            }

            let kind = RecordKind::from_name(&descriptor.name);
            let path = record_path(&base_dir, &descriptor.name);
            let mut items = load_item_list(&path, &descriptor.name)?;
            check_unique(&descriptor.name, kind, &items)?;
            for item in &mut items {
                normalize(&descriptor.name, kind, item);
            }

            if kind == RecordKind::Logs && items.len() > config.logs_size {
                let overflow = items.len().saturating_sub(config.logs_size);
                warn!(
                    record = %descriptor.name,
                    dropped = overflow,
                    "log record exceeds logs_size, dropping oldest entries"
                );
                items.drain(..overflow);
            }

            debug!(record = %descriptor.name, items = items.len(), "loaded record");
            records.push(Record {
                name: descriptor.name,
                description: descriptor.description,
                kind,
                items,
            });
        }

        info!(
            records = records.len(),
            base_dir = %base_dir.display(),
            "record store loaded"
        );

        Ok(Self {
            base_dir,
            records,
            config,
        })
    }

    /// Look up a record by name.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::RecordNotFound`] if the manifest does not
    /// declare `name`.
    pub fn get(&self, name: &str) -> Result<&Record, MemoryError> {
        self.records
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| MemoryError::RecordNotFound(name.to_owned()))
    }

    pub(crate) fn record_mut(&mut self, name: &str) -> Result<&mut Record, MemoryError> {
        self.records
            .iter_mut()
            .find(|r| r.name == name)
            .ok_or_else(|| MemoryError::RecordNotFound(name.to_owned()))
    }

    /// All records in manifest order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// The memory configuration this store was loaded with.
    pub const fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Directory holding the record files.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Names of the actions the character may take, in catalog order.
    ///
    /// Empty when the manifest declares no `actions` record.
    pub fn action_names(&self) -> Vec<String> {
        self.get(ACTIONS)
            .map(|record| record.items.iter().map(|item| item.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Whether `action` is listed in the action catalog.
    pub fn knows_action(&self, action: &str) -> bool {
        self.get(ACTIONS)
            .is_ok_and(|record| record.find(action).is_some())
    }

    /// Write one record to its backing file.
    ///
    /// The file is written to a temporary sibling first and then renamed
    /// over the target, so readers never observe a half-written record.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::RecordNotFound`] for an undeclared record,
    /// [`MemoryError::Encode`] if the items cannot be encoded, or
    /// [`MemoryError::Io`] if the write fails.
    pub fn persist(&self, name: &str) -> Result<(), MemoryError> {
        let record = self.get(name)?;

        let mut document = BTreeMap::new();
        document.insert(record.name.as_str(), record.items.as_slice());
        let body = serde_json::to_string_pretty(&document).map_err(|source| {
            MemoryError::Encode {
                record: name.to_owned(),
                source,
            }
        })?;

        let path = record_path(&self.base_dir, name);
        write_atomically(&self.base_dir, &path, &body).map_err(|source| {
            error!(
                record = %name,
                path = %path.display(),
                error = %source,
                "failed to persist record"
            );
            MemoryError::Io {
                record: name.to_owned(),
                source,
            }
        })?;

        debug!(record = %name, items = record.items.len(), "record persisted");
        Ok(())
    }
}

/// Read a `{"<key>": [item, ...]}` document.
///
/// A missing or empty file yields an empty list.
///
/// # Errors
///
/// Returns [`MemoryError::Config`] if the file is not valid JSON of that
/// shape or holds no `key` entry, or [`MemoryError::Io`] if it exists but
/// cannot be read.
pub fn load_item_list(path: &Path, key: &str) -> Result<Vec<Item>, MemoryError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "record file absent, starting empty");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(MemoryError::Io {
                record: key.to_owned(),
                source,
            });
        }
    };

    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut document: BTreeMap<String, Vec<Item>> = serde_json::from_str(&raw)
        .map_err(|e| MemoryError::Config(format!("malformed record file {}: {e}", path.display())))?;

    document.remove(key).ok_or_else(|| {
        MemoryError::Config(format!(
            "record file {} has no \"{key}\" entry",
            path.display()
        ))
    })
}

pub(crate) fn record_path(base_dir: &Path, name: &str) -> PathBuf {
    base_dir.join(format!("{name}.json"))
}

/// Enforce per-kind item invariants on an item entering a record.
pub(crate) fn normalize(record: &str, kind: RecordKind, item: &mut Item) {
    if kind == RecordKind::Inventory && item.quantity.is_none() {
        warn!(record = %record, item = %item.name, "inventory item without quantity, assuming 0");
        item.quantity = Some(0);
    }
}

fn check_unique(record: &str, kind: RecordKind, items: &[Item]) -> Result<(), MemoryError> {
    if !kind.unique_names() {
        return Ok(());
    }
    for (index, item) in items.iter().enumerate() {
        if items
            .iter()
            .skip(index.saturating_add(1))
            .any(|other| other.name == item.name)
        {
            return Err(MemoryError::Config(format!(
                "record '{record}' holds item '{}' more than once",
                item.name
            )));
        }
    }
    Ok(())
}

fn write_atomically(dir: &Path, path: &Path, body: &str) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body)?;
    fs::rename(&tmp, path)
}
