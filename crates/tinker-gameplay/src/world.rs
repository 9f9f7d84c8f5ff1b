//! In-memory host.
//!
//! [`ItemWorld`] stands in for the engine: it owns item entities, their
//! stack sizes, per-entity inventories, the prefab catalog and the block
//! family registry, and implements every host trait the crafting module
//! consumes. Tools and tests drive crafting through it.

use ahash::AHashMap;
use tinker_common::{EntityId, ResourceUrn};
use tracing::trace;

use crate::events::{CraftingEvent, EventBus, OnRecipeCrafted};
use crate::host::{
    BlockFamily, CraftedEvents, InventoryAccess, InventoryMutation, ItemFactory, ItemIdentity,
};
use crate::inventory::{InventoryError, InventoryResult, SlotInventory};
use crate::matching::eq_ignore_case;
use crate::prefab::PrefabCatalog;
use crate::recipes::Recipe;

#[derive(Debug, Clone, PartialEq, Eq)]
enum ItemKind {
    Prefab {
        urn: ResourceUrn,
        ingredient_ids: Vec<String>,
    },
    Block {
        family: String,
    },
}

#[derive(Debug, Clone)]
struct ItemStack {
    kind: ItemKind,
    count: u32,
}

/// Entity table, inventories and content registries in one place.
#[derive(Debug, Default)]
pub struct ItemWorld {
    catalog: PrefabCatalog,
    block_families: AHashMap<String, BlockFamily>,
    items: AHashMap<EntityId, ItemStack>,
    inventories: AHashMap<EntityId, SlotInventory>,
    notifications: Vec<(EntityId, OnRecipeCrafted)>,
    events: EventBus,
}

impl ItemWorld {
    /// Creates a world over a prefab catalog.
    #[must_use]
    pub fn new(catalog: PrefabCatalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Registers a block family.
    pub fn add_block_family(&mut self, family: BlockFamily) {
        self.block_families.insert(family.uri.key(), family);
    }

    /// The prefab catalog.
    #[must_use]
    pub const fn catalog(&self) -> &PrefabCatalog {
        &self.catalog
    }

    /// Looks up a block family by full URI, or by short name when unique.
    #[must_use]
    pub fn block_family(&self, name: &str) -> Option<&BlockFamily> {
        if let Some(family) = self.block_families.get(&name.to_lowercase()) {
            return Some(family);
        }
        let mut candidates = self
            .block_families
            .values()
            .filter(|family| eq_ignore_case(family.uri.short_name(), name));
        match (candidates.next(), candidates.next()) {
            (Some(family), None) => Some(family),
            _ => None,
        }
    }

    /// Creates an entity with an empty inventory of `slots` slots.
    pub fn spawn_container(&mut self, slots: usize) -> EntityId {
        let entity = EntityId::new();
        self.inventories.insert(entity, SlotInventory::new(slots));
        entity
    }

    /// Creates a stack from a prefab or, failing that, a block family.
    pub fn spawn_item(&mut self, name: &str, count: u32) -> Option<EntityId> {
        let kind = self.resolve_kind(name)?;
        Some(self.spawn_stack(kind, count))
    }

    /// Creates a stack and puts it into a specific slot.
    pub fn put_item(
        &mut self,
        entity: EntityId,
        slot: usize,
        name: &str,
        count: u32,
    ) -> InventoryResult<EntityId> {
        if !self.inventories.contains_key(&entity) {
            return Err(InventoryError::NoInventory(entity));
        }
        let item = self
            .spawn_item(name, count)
            .ok_or_else(|| InventoryError::UnknownItem(name.to_string()))?;
        let result = self
            .inventories
            .get_mut(&entity)
            .ok_or(InventoryError::NoInventory(entity))
            .and_then(|inventory| inventory.put(slot, item));
        if let Err(error) = result {
            self.items.remove(&item);
            return Err(error);
        }
        Ok(item)
    }

    /// Locks a slot so the host refuses to remove from it.
    pub fn lock_slot(&mut self, entity: EntityId, slot: usize) -> InventoryResult<()> {
        self.inventory_mut(entity)?.set_locked(slot, true)
    }

    /// Unlocks a slot.
    pub fn unlock_slot(&mut self, entity: EntityId, slot: usize) -> InventoryResult<()> {
        self.inventory_mut(entity)?.set_locked(slot, false)
    }

    /// An entity's inventory.
    #[must_use]
    pub fn inventory(&self, entity: EntityId) -> Option<&SlotInventory> {
        self.inventories.get(&entity)
    }

    /// Canonical name of an item entity.
    #[must_use]
    pub fn item_name(&self, item: EntityId) -> Option<String> {
        self.item_identity(item).map(|identity| identity.canonical_name())
    }

    /// Whether an item entity still exists.
    #[must_use]
    pub fn is_alive(&self, item: EntityId) -> bool {
        self.items.contains_key(&item)
    }

    /// Destroys an item entity.
    pub fn destroy(&mut self, item: EntityId) {
        self.items.remove(&item);
    }

    /// Stack size in a slot, zero when empty.
    #[must_use]
    pub fn count_in_slot(&self, entity: EntityId, slot: usize) -> u32 {
        self.item_at(entity, slot)
            .map_or(0, |item| self.stack_count(item))
    }

    /// Total items in an entity's inventory whose full or short name is `name`.
    #[must_use]
    pub fn count_of(&self, entity: EntityId, name: &str) -> u32 {
        let Some(inventory) = self.inventories.get(&entity) else {
            return 0;
        };
        inventory
            .iter()
            .filter_map(|(_, item)| {
                let identity = self.item_identity(item)?;
                let named = eq_ignore_case(&identity.canonical_name(), name)
                    || eq_ignore_case(identity.short_name(), name);
                named.then(|| self.stack_count(item))
            })
            .sum()
    }

    /// Crafted notifications delivered so far.
    #[must_use]
    pub fn notifications(&self) -> &[(EntityId, OnRecipeCrafted)] {
        &self.notifications
    }

    /// The world's event bus.
    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    fn resolve_kind(&self, name: &str) -> Option<ItemKind> {
        if let Some(prefab) = self.catalog.resolve(name) {
            return Some(ItemKind::Prefab {
                urn: prefab.name.clone(),
                ingredient_ids: prefab.ingredient_ids().to_vec(),
            });
        }
        self.block_family(name).map(|family| ItemKind::Block {
            family: family.uri.key(),
        })
    }

    fn spawn_stack(&mut self, kind: ItemKind, count: u32) -> EntityId {
        let item = EntityId::new();
        trace!("Spawned {} x{}", item, count);
        self.items.insert(item, ItemStack { kind, count });
        item
    }

    fn inventory_mut(&mut self, entity: EntityId) -> InventoryResult<&mut SlotInventory> {
        self.inventories
            .get_mut(&entity)
            .ok_or(InventoryError::NoInventory(entity))
    }

    /// Adds `item`'s count onto `target` if they are the same kind.
    fn merge_into(&mut self, target: EntityId, item: EntityId) -> bool {
        if target == item {
            return false;
        }
        let Some(incoming) = self.items.get(&item).cloned() else {
            return false;
        };
        match self.items.get_mut(&target) {
            Some(stack) if stack.kind == incoming.kind => {
                let Some(total) = stack.count.checked_add(incoming.count) else {
                    return false;
                };
                stack.count = total;
                self.items.remove(&item);
                true
            },
            _ => false,
        }
    }
}

impl InventoryAccess for ItemWorld {
    fn has_inventory(&self, entity: EntityId) -> bool {
        self.inventories.contains_key(&entity)
    }

    fn slot_count(&self, entity: EntityId) -> usize {
        self.inventories.get(&entity).map_or(0, SlotInventory::len)
    }

    fn item_at(&self, entity: EntityId, slot: usize) -> Option<EntityId> {
        self.inventories.get(&entity)?.get(slot)
    }

    fn stack_count(&self, item: EntityId) -> u32 {
        self.items.get(&item).map_or(0, |stack| stack.count)
    }

    fn item_identity(&self, item: EntityId) -> Option<ItemIdentity<'_>> {
        match &self.items.get(&item)?.kind {
            ItemKind::Prefab {
                urn,
                ingredient_ids,
            } => Some(ItemIdentity::Prefab {
                urn,
                ingredient_ids,
            }),
            ItemKind::Block { family } => self
                .block_families
                .get(family)
                .map(|family| ItemIdentity::Block { family }),
        }
    }
}

impl InventoryMutation for ItemWorld {
    fn remove_from_slot(
        &mut self,
        entity: EntityId,
        slot: usize,
        count: u32,
        destroy_on_zero: bool,
    ) -> Option<EntityId> {
        let inventory = self.inventories.get(&entity)?;
        if inventory.is_locked(slot) || count == 0 {
            return None;
        }
        let item = inventory.get(slot)?;
        let stack = self.items.get(&item)?.clone();
        if stack.count < count {
            return None;
        }

        if stack.count > count {
            if let Some(remaining) = self.items.get_mut(&item) {
                remaining.count -= count;
            }
            return Some(self.spawn_stack(stack.kind, count));
        }

        self.inventories.get_mut(&entity)?.take(slot).ok()?;
        if destroy_on_zero {
            self.items.remove(&item);
            return Some(self.spawn_stack(stack.kind, count));
        }
        Some(item)
    }

    fn give_item(&mut self, entity: EntityId, item: EntityId) -> bool {
        if !self.items.contains_key(&item) {
            return false;
        }
        let Some(inventory) = self.inventories.get(&entity) else {
            return false;
        };
        let occupied: Vec<EntityId> = inventory.iter().map(|(_, held)| held).collect();
        if occupied.iter().any(|&held| self.merge_into(held, item)) {
            return true;
        }
        self.inventories
            .get_mut(&entity)
            .is_some_and(|inventory| inventory.insert(item).is_ok())
    }

    fn destroy_item(&mut self, item: EntityId) {
        self.destroy(item);
    }

    fn restore_to_slot(&mut self, entity: EntityId, slot: usize, item: EntityId) -> bool {
        match self.item_at(entity, slot) {
            Some(held) if self.merge_into(held, item) => true,
            None => self
                .inventories
                .get_mut(&entity)
                .is_some_and(|inventory| inventory.put(slot, item).is_ok()),
            Some(_) => self.give_item(entity, item),
        }
    }
}

impl ItemFactory for ItemWorld {
    fn prefab_exists(&self, name: &str) -> bool {
        self.catalog.resolve(name).is_some()
    }

    fn create_from_prefab(&mut self, name: &str) -> Option<EntityId> {
        let prefab = self.catalog.resolve(name)?;
        let kind = ItemKind::Prefab {
            urn: prefab.name.clone(),
            ingredient_ids: prefab.ingredient_ids().to_vec(),
        };
        Some(self.spawn_stack(kind, 1))
    }

    fn block_family_exists(&self, name: &str) -> bool {
        self.block_family(name).is_some()
    }

    fn create_block_item(&mut self, name: &str) -> Option<EntityId> {
        let family = self.block_family(name)?.uri.key();
        Some(self.spawn_stack(ItemKind::Block { family }, 1))
    }
}

impl CraftedEvents for ItemWorld {
    fn send_crafted(&mut self, product: EntityId, event: &OnRecipeCrafted) {
        self.notifications.push((product, event.clone()));
        self.events.publish(CraftingEvent::ProductNotified {
            product,
            event: event.clone(),
        });
    }

    fn recipe_crafted(&mut self, crafter: EntityId, recipe: &Recipe, products: &[EntityId]) {
        self.events.publish(CraftingEvent::RecipeCrafted {
            crafter,
            output: recipe.output().to_string(),
            products: products.to_vec(),
        });
    }

    fn craft_aborted(&mut self, crafter: EntityId, recipe: &Recipe) {
        self.events.publish(CraftingEvent::CraftAborted {
            crafter,
            output: recipe.output().to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefab::PrefabDefinition;

    fn world() -> ItemWorld {
        let catalog = PrefabCatalog::from_prefabs([
            PrefabDefinition::new("core:stick".parse().expect("urn")),
            PrefabDefinition::new("core:plank".parse().expect("urn")).with_ingredient_ids(["wood"]),
        ]);
        let mut world = ItemWorld::new(catalog);
        world.add_block_family(BlockFamily::new("core:granite".parse().expect("uri"), ["stone"]));
        world
    }

    #[test]
    fn test_put_and_identity() {
        let mut world = world();
        let chest = world.spawn_container(4);
        let plank = world.put_item(chest, 0, "plank", 3).expect("put");
        let granite = world.put_item(chest, 1, "core:granite", 2).expect("put");

        assert_eq!(world.item_name(plank).as_deref(), Some("core:plank"));
        assert!(matches!(
            world.item_identity(plank),
            Some(ItemIdentity::Prefab { ingredient_ids, .. }) if ingredient_ids == ["wood"]
        ));
        assert!(matches!(world.item_identity(granite), Some(ItemIdentity::Block { .. })));
        assert_eq!(world.count_of(chest, "plank"), 3);
        assert!(world.put_item(chest, 2, "core:diamond", 1).is_err());
    }

    #[test]
    fn test_partial_removal_splits_stack() {
        let mut world = world();
        let chest = world.spawn_container(2);
        let sticks = world.put_item(chest, 0, "stick", 5).expect("put");

        let removed = world.remove_from_slot(chest, 0, 2, false).expect("removed");
        assert_ne!(removed, sticks);
        assert_eq!(world.stack_count(removed), 2);
        assert_eq!(world.count_in_slot(chest, 0), 3);
    }

    #[test]
    fn test_full_removal_empties_slot() {
        let mut world = world();
        let chest = world.spawn_container(1);
        let sticks = world.put_item(chest, 0, "stick", 2).expect("put");

        assert_eq!(world.remove_from_slot(chest, 0, 2, false), Some(sticks));
        assert_eq!(world.item_at(chest, 0), None);
        assert!(world.is_alive(sticks));
        assert!(world.remove_from_slot(chest, 0, 1, false).is_none());
    }

    #[test]
    fn test_locked_slot_refuses_removal() {
        let mut world = world();
        let chest = world.spawn_container(1);
        world.put_item(chest, 0, "stick", 2).expect("put");
        world.lock_slot(chest, 0).expect("lock");
        assert!(world.remove_from_slot(chest, 0, 1, false).is_none());
        world.unlock_slot(chest, 0).expect("unlock");
        assert!(world.remove_from_slot(chest, 0, 1, false).is_some());
    }

    #[test]
    fn test_give_merges_matching_stack() {
        let mut world = world();
        let chest = world.spawn_container(2);
        world.put_item(chest, 1, "stick", 2).expect("put");
        let more = world.spawn_item("stick", 3).expect("spawn");

        assert!(world.give_item(chest, more));
        assert!(!world.is_alive(more));
        assert_eq!(world.count_in_slot(chest, 1), 5);

        let plank = world.create_from_prefab("plank").expect("create");
        assert!(world.give_item(chest, plank));
        assert_eq!(world.item_at(chest, 0), Some(plank));
    }

    #[test]
    fn test_merge_refuses_overflow() {
        let mut world = world();
        let chest = world.spawn_container(2);
        world.put_item(chest, 1, "stick", u32::MAX).expect("put");
        let more = world.spawn_item("stick", 1).expect("spawn");

        assert!(world.give_item(chest, more));
        assert_eq!(world.count_in_slot(chest, 1), u32::MAX);
        assert_eq!(world.item_at(chest, 0), Some(more));
        assert!(world.is_alive(more));
    }

    #[test]
    fn test_restore_returns_to_original_slot() {
        let mut world = world();
        let chest = world.spawn_container(3);
        world.put_item(chest, 2, "stick", 4).expect("put");

        let removed = world.remove_from_slot(chest, 2, 4, false).expect("removed");
        assert!(world.restore_to_slot(chest, 2, removed));
        assert_eq!(world.count_in_slot(chest, 2), 4);

        let partial = world.remove_from_slot(chest, 2, 1, false).expect("removed");
        assert!(world.restore_to_slot(chest, 2, partial));
        assert_eq!(world.count_in_slot(chest, 2), 4);
    }
}
