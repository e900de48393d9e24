//! Record items and manifest entries.
//!
//! A record file on disk has the shape `{"<record>": [item, ...]}` where each
//! item is `{"name", "description", "quantity"?}`. The manifest is a JSON
//! array of [`RecordDescriptor`] values naming which records exist.

use serde::{Deserialize, Serialize};

/// Name of the record holding the character's items and their quantities.
pub const INVENTORY: &str = "inventory";
/// Name of the record holding vital-stat descriptors.
pub const PLAYER_INFO: &str = "player_info";
/// Name of the bounded action log record.
pub const LOGS: &str = "logs";
/// Name of the record holding the active objectives.
pub const OBJECTIVES: &str = "objectives";
/// Name of the record holding free-form world facts.
pub const GAME_INFO: &str = "game_info";
/// Name of the record listing the actions the character may take.
pub const ACTIONS: &str = "actions";

/// One entry of the record manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDescriptor {
    /// Record name; also the stem of its backing file.
    pub name: String,
    /// Human-readable purpose, shown to the model next to the record title.
    pub description: String,
}

/// A single named entry inside a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique key within the record (the log record excepted).
    pub name: String,
    /// Free text or a stringified value.
    pub description: String,
    /// Owned quantity. Only meaningful in the inventory record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

impl Item {
    /// Create an item without a quantity.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            quantity: None,
        }
    }

    /// Create an inventory item carrying a quantity.
    pub fn stocked(name: impl Into<String>, description: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            quantity: Some(quantity),
        }
    }

    /// Create the log entry describing one executed action.
    pub fn log_entry(action: &str, status: &str, message: &str) -> Self {
        Self::new(
            action,
            format!(
                "The action '{action}' was executed with status '{status}' and message: '{message}'."
            ),
        )
    }
}

/// The category a record belongs to, derived from its name.
///
/// The kind decides how a record is rendered and which load-time
/// normalization applies; everything else treats records uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Item quantities; rendered with an ownership suffix.
    Inventory,
    /// Vital-stat descriptors.
    PlayerInfo,
    /// Bounded FIFO history of executed actions.
    Logs,
    /// Currently active objectives.
    Objectives,
    /// Free-form world facts.
    GameInfo,
    /// The action catalog the model chooses from.
    Actions,
    /// Any other record declared in the manifest.
    Other,
}

impl RecordKind {
    /// Classify a record by its manifest name.
    pub fn from_name(name: &str) -> Self {
        match name {
            INVENTORY => Self::Inventory,
            PLAYER_INFO => Self::PlayerInfo,
            LOGS => Self::Logs,
            OBJECTIVES => Self::Objectives,
            GAME_INFO => Self::GameInfo,
            ACTIONS => Self::Actions,
            _ => Self::Other,
        }
    }

    /// Whether item names must be unique in records of this kind.
    ///
    /// The log is a history, so the same action name legitimately repeats.
    pub const fn unique_names(self) -> bool {
        !matches!(self, Self::Logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_omitted_when_absent() {
        let item = Item::new("health", "Good");
        let json = serde_json::to_string(&item).unwrap_or_default();
        assert_eq!(json, r#"{"name":"health","description":"Good"}"#);
    }

    #[test]
    fn quantity_defaults_to_none_on_read() {
        let item: Item = serde_json::from_str(r#"{"name": "eat", "description": "Eat food"}"#)
            .unwrap_or_else(|_| Item::new("", ""));
        assert_eq!(item.name, "eat");
        assert_eq!(item.quantity, None);
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let parsed = serde_json::from_str::<Item>(
            r#"{"name": "axe", "description": "a tool", "quantity": -1}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn log_entry_sentence() {
        let item = Item::log_entry("craft_raft", "failed", "not enough wood");
        assert_eq!(item.name, "craft_raft");
        assert_eq!(
            item.description,
            "The action 'craft_raft' was executed with status 'failed' and message: 'not enough wood'."
        );
    }

    #[test]
    fn kinds_from_names() {
        assert_eq!(RecordKind::from_name("inventory"), RecordKind::Inventory);
        assert_eq!(RecordKind::from_name("logs"), RecordKind::Logs);
        assert_eq!(RecordKind::from_name("current_plan"), RecordKind::Other);
        assert!(!RecordKind::Logs.unique_names());
        assert!(RecordKind::Actions.unique_names());
    }
}
