//! Slot inventory used by the in-memory host.
//!
//! Slots hold item entities; stack sizes live with the item, not the slot.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tinker_common::EntityId;

/// Inventory error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Slot index past the end
    #[error("Slot {slot} out of range: inventory has {size} slots")]
    OutOfRange {
        /// Requested slot
        slot: usize,
        /// Number of slots
        size: usize,
    },
    /// Slot holds nothing
    #[error("Slot {0} is empty")]
    EmptySlot(usize),
    /// Slot already holds an item
    #[error("Slot {0} is occupied")]
    Occupied(usize),
    /// No free slot left
    #[error("Inventory full: capacity {capacity}")]
    Full {
        /// Inventory capacity
        capacity: usize,
    },
    /// Slot is locked by the host
    #[error("Slot {0} is locked")]
    Locked(usize),
    /// Entity has no inventory
    #[error("{0} has no inventory")]
    NoInventory(EntityId),
    /// Name matches no prefab or block family
    #[error("Unknown item '{0}'")]
    UnknownItem(String),
}

/// Result type for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// An ordered sequence of optional item slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInventory {
    slots: Vec<Option<EntityId>>,
    #[serde(default)]
    locked: Vec<bool>,
}

impl SlotInventory {
    /// Creates an inventory with `size` empty slots.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
            locked: vec![false; size],
        }
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the inventory has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Item in a slot.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<EntityId> {
        self.slots.get(slot).copied().flatten()
    }

    /// Places an item into an empty slot.
    pub fn put(&mut self, slot: usize, item: EntityId) -> InventoryResult<()> {
        self.check(slot)?;
        if self.slots[slot].is_some() {
            return Err(InventoryError::Occupied(slot));
        }
        self.slots[slot] = Some(item);
        Ok(())
    }

    /// Takes the item out of a slot.
    pub fn take(&mut self, slot: usize) -> InventoryResult<EntityId> {
        self.check(slot)?;
        self.slots[slot].take().ok_or(InventoryError::EmptySlot(slot))
    }

    /// Index of the first empty slot.
    #[must_use]
    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Index of the slot holding `item`.
    #[must_use]
    pub fn find(&self, item: EntityId) -> Option<usize> {
        self.slots.iter().position(|slot| *slot == Some(item))
    }

    /// Puts an item in the first empty slot, returning its index.
    pub fn insert(&mut self, item: EntityId) -> InventoryResult<usize> {
        let slot = self.first_empty().ok_or(InventoryError::Full {
            capacity: self.len(),
        })?;
        self.slots[slot] = Some(item);
        Ok(slot)
    }

    /// Locks or unlocks a slot. Locked slots refuse removal.
    pub fn set_locked(&mut self, slot: usize, locked: bool) -> InventoryResult<()> {
        self.check_range(slot)?;
        if self.locked.len() < self.slots.len() {
            self.locked.resize(self.slots.len(), false);
        }
        self.locked[slot] = locked;
        Ok(())
    }

    /// Whether a slot is locked.
    #[must_use]
    pub fn is_locked(&self, slot: usize) -> bool {
        self.locked.get(slot).copied().unwrap_or(false)
    }

    /// Occupied slots in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, EntityId)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, item)| item.map(|item| (slot, item)))
    }

    fn check_range(&self, slot: usize) -> InventoryResult<()> {
        if slot < self.slots.len() {
            Ok(())
        } else {
            Err(InventoryError::OutOfRange {
                slot,
                size: self.slots.len(),
            })
        }
    }

    fn check(&self, slot: usize) -> InventoryResult<()> {
        self.check_range(slot)?;
        if self.is_locked(slot) {
            return Err(InventoryError::Locked(slot));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_fills_lowest_slot() {
        let mut inventory = SlotInventory::new(3);
        let a = EntityId::new();
        let b = EntityId::new();
        inventory.put(0, a).expect("put");
        assert_eq!(inventory.insert(b), Ok(1));
        assert_eq!(inventory.find(b), Some(1));
        assert_eq!(inventory.iter().count(), 2);
    }

    #[test]
    fn test_full_inventory() {
        let mut inventory = SlotInventory::new(1);
        inventory.insert(EntityId::new()).expect("insert");
        assert_eq!(
            inventory.insert(EntityId::new()),
            Err(InventoryError::Full { capacity: 1 })
        );
    }

    #[test]
    fn test_take_and_errors() {
        let mut inventory = SlotInventory::new(2);
        let item = EntityId::new();
        inventory.put(1, item).expect("put");
        assert_eq!(inventory.put(1, item), Err(InventoryError::Occupied(1)));
        assert_eq!(inventory.take(1), Ok(item));
        assert_eq!(inventory.take(1), Err(InventoryError::EmptySlot(1)));
        assert_eq!(
            inventory.take(5),
            Err(InventoryError::OutOfRange { slot: 5, size: 2 })
        );
    }

    #[test]
    fn test_locked_slot_refuses_changes() {
        let mut inventory = SlotInventory::new(2);
        let item = EntityId::new();
        inventory.put(0, item).expect("put");
        inventory.set_locked(0, true).expect("lock");
        assert_eq!(inventory.take(0), Err(InventoryError::Locked(0)));
        assert_eq!(inventory.get(0), Some(item));

        inventory.set_locked(0, false).expect("unlock");
        assert_eq!(inventory.take(0), Ok(item));
    }
}
