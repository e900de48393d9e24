//! The inbound game event.
//!
//! The caller reports what it just tried, how it went, and the resulting
//! inventory and vitals. The shape is validated strictly: unknown keys and
//! missing keys are both rejected by deserialization, and inventory item
//! names are additionally checked against the configured item list with
//! [`InventoryReport::validate`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A game event posted by the caller after executing an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionRequest {
    /// Name of the action the caller just attempted.
    pub action: String,
    /// Outcome status (`success`, `failed`, or free text).
    pub status: String,
    /// Free-text description of the outcome.
    pub message: String,
    /// Quantities of every trackable item after the action.
    pub inventory: InventoryReport,
    /// Qualitative vital-stat descriptors after the action.
    pub player_info: PlayerInfoReport,
}

/// Reported item quantities, keyed by item name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryReport(BTreeMap<String, u32>);

impl InventoryReport {
    /// Build a report from `(name, quantity)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        Self(pairs.into_iter().map(|(name, qty)| (name.into(), qty)).collect())
    }

    /// Reported quantity for `item`, if the report mentions it.
    pub fn quantity(&self, item: &str) -> Option<u32> {
        self.0.get(item).copied()
    }

    /// Iterate over `(name, quantity)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(name, qty)| (name.as_str(), *qty))
    }

    /// Check the report against the configured inventory schema.
    ///
    /// Every reported name must be declared, and every declared name must
    /// be reported.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::UnknownItem`] for the first undeclared name,
    /// or [`ReportError::MissingItem`] for the first declared name that is
    /// absent from the report.
    pub fn validate(&self, declared: &[String]) -> Result<(), ReportError> {
        if let Some(unknown) = self.0.keys().find(|name| !declared.contains(name)) {
            return Err(ReportError::UnknownItem(unknown.clone()));
        }
        if let Some(missing) = declared.iter().find(|name| !self.0.contains_key(*name)) {
            return Err(ReportError::MissingItem(missing.clone()));
        }
        Ok(())
    }
}

/// Reported vital-stat descriptors.
///
/// Values are typically qualitative strings from "Very Low" to "Very Good".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerInfoReport {
    /// Health descriptor.
    pub health: String,
    /// Hunger descriptor.
    pub hunger: String,
    /// Thirst descriptor.
    pub thirst: String,
    /// Energy descriptor.
    pub energy: String,
}

impl PlayerInfoReport {
    /// The report as `(vital name, descriptor)` pairs, in declaration order.
    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            ("health", self.health.as_str()),
            ("hunger", self.hunger.as_str()),
            ("thirst", self.thirst.as_str()),
            ("energy", self.energy.as_str()),
        ]
    }
}

/// A game event that does not match the configured inventory schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    /// The report names an item the inventory schema does not declare.
    #[error("unknown inventory item: {0}")]
    UnknownItem(String),

    /// The report omits an item the inventory schema declares.
    #[error("missing inventory item: {0}")]
    MissingItem(String),
}
