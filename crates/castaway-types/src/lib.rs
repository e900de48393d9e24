//! Shared type definitions for the Castaway decision service.
//!
//! This crate is the single source of truth for the values that cross a
//! boundary: items stored in record files, the record manifest, the game
//! event posted by the caller, and the decision returned to it.
//!
//! # Modules
//!
//! - [`records`] -- Items, record kinds, and manifest entries
//! - [`events`] -- Inbound game event and its strict sub-reports
//! - [`decision`] -- Outbound decision result and its sentinel values

pub mod decision;
pub mod events;
pub mod records;

// Re-export all public types at crate root for convenience.
pub use decision::DecisionResult;
pub use events::{ActionRequest, InventoryReport, PlayerInfoReport, ReportError};
pub use records::{Item, RecordDescriptor, RecordKind};
