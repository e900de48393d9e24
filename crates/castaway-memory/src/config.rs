//! Memory tunables.
//!
//! These live in the `memory` section of `castaway.yaml`. Every field has a
//! default, so an empty section (or no file at all) yields a working setup
//! for the island survival game.

use castaway_types::InventoryReport;
use serde::Deserialize;

use crate::error::MemoryError;

/// Memory configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemoryConfig {
    /// Maximum number of entries kept in the `logs` record.
    #[serde(default = "default_logs_size")]
    pub logs_size: usize,

    /// Item names a game event must report in its inventory.
    #[serde(default = "default_inventory_items")]
    pub inventory_items: Vec<String>,

    /// Descriptor written to every vital on a new game.
    #[serde(default = "default_vitals_max")]
    pub vitals_max: String,

    /// Ordered objective stages. The first stage is seeded on a new game.
    #[serde(default = "default_objective_chain")]
    pub objective_chain: Vec<ObjectiveStage>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            logs_size: default_logs_size(),
            inventory_items: default_inventory_items(),
            vitals_max: default_vitals_max(),
            objective_chain: default_objective_chain(),
        }
    }
}

impl MemoryConfig {
    /// Reject configurations the store cannot honor.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::Config`] when the log bound is zero, an
    /// inventory item is declared twice, or an objective trigger names an
    /// item outside the inventory schema.
    pub fn validate(&self) -> Result<(), MemoryError> {
        if self.logs_size == 0 {
            return Err(MemoryError::Config("logs_size must be at least 1".to_owned()));
        }

        for (index, item) in self.inventory_items.iter().enumerate() {
            if self.inventory_items.iter().skip(index.saturating_add(1)).any(|other| other == item) {
                return Err(MemoryError::Config(format!(
                    "inventory item declared twice: {item}"
                )));
            }
        }

        for stage in &self.objective_chain {
            if let Some(trigger) = &stage.completed_when
                && !self.inventory_items.contains(&trigger.item)
            {
                return Err(MemoryError::Config(format!(
                    "objective '{}' is completed by unknown inventory item '{}'",
                    stage.name, trigger.item
                )));
            }
        }

        Ok(())
    }

    /// The objective seeded when a new game starts.
    pub fn starting_objective(&self) -> Option<&ObjectiveStage> {
        self.objective_chain.first()
    }
}

/// One stage of the objective chain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObjectiveStage {
    /// Objective name, as stored in the `objectives` record.
    pub name: String,
    /// Objective description shown to the model.
    pub description: String,
    /// Inventory condition that marks this stage as done.
    ///
    /// A stage without a trigger is terminal: nothing advances past it.
    #[serde(default)]
    pub completed_when: Option<ObjectiveTrigger>,
}

/// Inventory threshold that completes an objective stage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObjectiveTrigger {
    /// Inventory item to watch.
    pub item: String,
    /// Minimum reported quantity.
    #[serde(default = "default_at_least")]
    pub at_least: u32,
}

impl ObjectiveTrigger {
    /// Whether the reported inventory satisfies this trigger.
    pub fn is_met(&self, inventory: &InventoryReport) -> bool {
        inventory
            .quantity(&self.item)
            .is_some_and(|qty| qty >= self.at_least)
    }
}

const fn default_logs_size() -> usize {
    8
}

fn default_inventory_items() -> Vec<String> {
    ["axe", "fibers", "stone", "wood", "stick", "shelter", "firepit"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

fn default_vitals_max() -> String {
    "Very good".to_owned()
}

fn default_objective_chain() -> Vec<ObjectiveStage> {
    vec![
        ObjectiveStage {
            name: "Build Shelter".to_owned(),
            description: "Build a shelter to rest safely and protect yourself from the weather."
                .to_owned(),
            completed_when: Some(ObjectiveTrigger {
                item: "shelter".to_owned(),
                at_least: 1,
            }),
        },
        ObjectiveStage {
            name: "Build Firepit".to_owned(),
            description: "Build a firepit to cook food and keep warm.".to_owned(),
            completed_when: Some(ObjectiveTrigger {
                item: "firepit".to_owned(),
                at_least: 1,
            }),
        },
    ]
}

const fn default_at_least() -> u32 {
    1
}
