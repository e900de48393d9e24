//! Record mutations.
//!
//! Every operation here rewrites the backing file of the record it touched
//! before returning. The composite [`RecordStore::update_from_action_request`]
//! runs all of its steps even when an earlier one fails, so a bad vital name
//! never prevents the log entry or the inventory from being recorded.

use castaway_types::records::{GAME_INFO, INVENTORY, LOGS, OBJECTIVES, PLAYER_INFO};
use castaway_types::{ActionRequest, InventoryReport, Item, RecordKind};
use tracing::{debug, info};

use crate::error::MemoryError;
use crate::store::{RecordStore, normalize};

impl RecordStore {
    /// Append an item to a record.
    ///
    /// The log record is bounded by `logs_size`: appending to a full log
    /// evicts the oldest entries first.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::RecordNotFound`] for an undeclared record,
    /// [`MemoryError::DuplicateItem`] if a non-log record already holds an
    /// item with this name, or a persistence error.
    pub fn add_item(&mut self, record: &str, mut item: Item) -> Result<(), MemoryError> {
        let logs_size = self.config().logs_size;
        let target = self.record_mut(record)?;

        if target.kind.unique_names() && target.find(&item.name).is_some() {
            return Err(MemoryError::DuplicateItem {
                record: record.to_owned(),
                item: item.name,
            });
        }

        normalize(record, target.kind, &mut item);
        target.items.push(item);

        if target.kind == RecordKind::Logs {
            let overflow = target.items.len().saturating_sub(logs_size);
            if overflow > 0 {
                target.items.drain(..overflow);
                debug!(record = %record, evicted = overflow, "log full, evicted oldest");
            }
        }

        self.persist(record)
    }

    /// Replace the first item named `name` with `new_item`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::ItemNotFound`] when no item matches (nothing is
    /// written), [`MemoryError::DuplicateItem`] when the replacement renames
    /// the item onto another existing name, or a lookup/persistence error.
    pub fn edit_item(
        &mut self,
        record: &str,
        name: &str,
        mut new_item: Item,
    ) -> Result<(), MemoryError> {
        let target = self.record_mut(record)?;

        let Some(position) = target.items.iter().position(|item| item.name == name) else {
            return Err(MemoryError::ItemNotFound {
                record: record.to_owned(),
                item: name.to_owned(),
            });
        };

        if target.kind.unique_names()
            && new_item.name != name
            && target.find(&new_item.name).is_some()
        {
            return Err(MemoryError::DuplicateItem {
                record: record.to_owned(),
                item: new_item.name,
            });
        }

        normalize(record, target.kind, &mut new_item);
        if let Some(slot) = target.items.get_mut(position) {
            *slot = new_item;
        }

        self.persist(record)
    }

    /// Remove every item named `name`, returning how many were removed.
    ///
    /// Removing a name that is not present is a no-op and writes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::RecordNotFound`] for an undeclared record, or a
    /// persistence error.
    pub fn remove_item(&mut self, record: &str, name: &str) -> Result<usize, MemoryError> {
        let target = self.record_mut(record)?;
        let before = target.items.len();
        target.items.retain(|item| item.name != name);
        let removed = before.saturating_sub(target.items.len());

        if removed > 0 {
            self.persist(record)?;
        }
        Ok(removed)
    }

    /// Empty a record.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::RecordNotFound`] for an undeclared record, or a
    /// persistence error.
    pub fn reset_record(&mut self, record: &str) -> Result<(), MemoryError> {
        self.record_mut(record)?.items.clear();
        self.persist(record)
    }

    /// Set every inventory quantity to zero.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::RecordNotFound`] if there is no inventory
    /// record, or a persistence error.
    pub fn reset_inventory_quantities(&mut self) -> Result<(), MemoryError> {
        for item in &mut self.record_mut(INVENTORY)?.items {
            item.quantity = Some(0);
        }
        self.persist(INVENTORY)
    }

    /// Set every vital descriptor to the configured maximum.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::RecordNotFound`] if there is no `player_info`
    /// record, or a persistence error.
    pub fn reset_vitals_to_max(&mut self) -> Result<(), MemoryError> {
        let max = self.config().vitals_max.clone();
        for item in &mut self.record_mut(PLAYER_INFO)?.items {
            item.description.clone_from(&max);
        }
        self.persist(PLAYER_INFO)
    }

    /// Copy reported quantities onto inventory items with the same names.
    ///
    /// Inventory items the report does not mention keep their quantity, and
    /// descriptions are never touched.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::RecordNotFound`] if there is no inventory
    /// record, or a persistence error.
    pub fn apply_inventory_report(&mut self, report: &InventoryReport) -> Result<(), MemoryError> {
        let inventory = self.record_mut(INVENTORY)?;
        for item in &mut inventory.items {
            if let Some(quantity) = report.quantity(&item.name) {
                item.quantity = Some(quantity);
            }
        }
        for (name, _) in report.iter() {
            if inventory.find(name).is_none() {
                debug!(item = %name, "reported item has no inventory entry, ignored");
            }
        }
        self.persist(INVENTORY)
    }

    /// Fold one game event into memory.
    ///
    /// Updates each vital, appends the log entry, then applies the reported
    /// inventory. All three steps run regardless of earlier failures.
    ///
    /// # Errors
    ///
    /// A single failing step is returned as-is; several are wrapped in
    /// [`MemoryError::Update`].
    pub fn update_from_action_request(&mut self, request: &ActionRequest) -> Result<(), MemoryError> {
        let mut failures = Vec::new();

        for (vital, value) in request.player_info.entries() {
            if let Err(e) = self.edit_item(PLAYER_INFO, vital, Item::new(vital, value)) {
                failures.push(e);
            }
        }

        let entry = Item::log_entry(&request.action, &request.status, &request.message);
        if let Err(e) = self.add_item(LOGS, entry) {
            failures.push(e);
        }

        if let Err(e) = self.apply_inventory_report(&request.inventory) {
            failures.push(e);
        }

        debug!(
            action = %request.action,
            status = %request.status,
            failed_steps = failures.len(),
            "event folded into memory"
        );
        MemoryError::collect(failures)
    }

    /// Reset memory for a fresh game.
    ///
    /// Clears the log, objectives and world facts, zeroes the inventory,
    /// restores every vital to the configured maximum, then seeds the first
    /// objective of the chain.
    ///
    /// # Errors
    ///
    /// Stops at the first failing step and returns its error.
    pub fn new_game(&mut self) -> Result<(), MemoryError> {
        self.reset_record(LOGS)?;
        self.reset_record(OBJECTIVES)?;
        self.reset_record(GAME_INFO)?;
        self.reset_inventory_quantities()?;
        self.reset_vitals_to_max()?;

        if let Some(stage) = self.config().starting_objective().cloned() {
            info!(objective = %stage.name, "new game started");
            self.add_item(OBJECTIVES, Item::new(stage.name, stage.description))?;
        } else {
            info!("new game started without an objective chain");
        }
        Ok(())
    }
}
