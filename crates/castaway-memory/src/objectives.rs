//! Forward-chained objectives.
//!
//! The chain is an ordered list of stages, each completed by an inventory
//! threshold. After every event the furthest completed stage picks its
//! successor as the single active objective. Objectives only move forward:
//! a stage already active is left alone, and a completed final stage has
//! no successor.

use castaway_types::records::OBJECTIVES;
use castaway_types::{InventoryReport, Item};
use tracing::info;

use crate::config::ObjectiveStage;
use crate::error::MemoryError;
use crate::store::RecordStore;

impl RecordStore {
    /// The stage that should be active given a reported inventory.
    ///
    /// `None` when no stage is complete yet, or when the furthest completed
    /// stage is the last one.
    pub fn next_objective(&self, inventory: &InventoryReport) -> Option<&ObjectiveStage> {
        let chain = &self.config().objective_chain;
        let reached = chain.iter().rposition(|stage| {
            stage
                .completed_when
                .as_ref()
                .is_some_and(|trigger| trigger.is_met(inventory))
        })?;
        chain.get(reached.checked_add(1)?)
    }

    /// Advance the objectives record from a reported inventory.
    ///
    /// Returns the name of the newly activated objective, or `None` when
    /// nothing changed.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::RecordNotFound`] if there is no `objectives`
    /// record, or a persistence error.
    pub fn update_objectives(
        &mut self,
        inventory: &InventoryReport,
    ) -> Result<Option<String>, MemoryError> {
        let Some(next) = self.next_objective(inventory).cloned() else {
            return Ok(None);
        };

        if self.get(OBJECTIVES)?.find(&next.name).is_some() {
            return Ok(None);
        }

        self.reset_record(OBJECTIVES)?;
        self.add_item(OBJECTIVES, Item::new(next.name.clone(), next.description))?;
        info!(objective = %next.name, "objective advanced");
        Ok(Some(next.name))
    }
}
