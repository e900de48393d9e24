//! Persistent, category-based memory for the Castaway decision service.
//!
//! The memory is a fixed set of named records (inventory, vitals, logs,
//! objectives, ...) declared by a manifest and persisted one JSON file per
//! record. This crate loads and saves those records, applies the mutation
//! rules (bounded log, event updates, objective chain), and renders the
//! whole set into the text block the model reads as context.
//!
//! # Modules
//!
//! - [`config`] -- Tunables: log bound, inventory schema, objective chain
//! - [`error`] -- [`MemoryError`] taxonomy
//! - [`store`] -- [`RecordStore`] load, lookup, and persistence
//! - [`mutate`] -- Item-level mutations and the composite event update
//! - [`objectives`] -- Forward-chained objective advancement
//! - [`render`] -- Text rendering of one record or the whole set
//! - [`tokens`] -- Token counting for observability

pub mod config;
pub mod error;
pub mod mutate;
pub mod objectives;
pub mod render;
pub mod store;
pub mod tokens;

pub use config::{MemoryConfig, ObjectiveStage, ObjectiveTrigger};
pub use error::MemoryError;
pub use store::{Record, RecordStore};
pub use tokens::TokenCounter;
