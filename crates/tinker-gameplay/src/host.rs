//! Interfaces the host engine provides to the crafting module.
//!
//! The crafting module never owns entities, prefabs or inventories. It
//! reads and mutates them through these traits:
//! - [`PrefabSource`] / [`PrefabView`]: bulk content enumeration at load time
//! - [`InventoryAccess`]: read-only slot scans and item identity
//! - [`InventoryMutation`]: removing inputs and handing out products
//! - [`ItemFactory`]: creating products from a prefab or a block family
//! - [`CraftedEvents`]: delivering [`OnRecipeCrafted`] to new products
//!
//! [`crate::world::ItemWorld`] implements all of them in memory.

use serde::{Deserialize, Serialize};
use std::fmt;
use tinker_common::{BlockUri, EntityId, ResourceUrn};

use crate::components::{
    ComponentToIngredientComponent, CraftingIngredientComponent, RecipeComponent,
};
use crate::events::OnRecipeCrafted;
use crate::recipes::Recipe;

const COMPONENT_SUFFIX: &str = "component";

/// A component type registered with the host.
///
/// Names are stored without the `Component` suffix, so `Flammable` and
/// `FlammableComponent` resolve to the same type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentType(String);

impl ComponentType {
    /// Creates a component type from a declared name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(Self::normalize(name))
    }

    /// The normalized, lowercase type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Normalizes a declared component name for lookup.
    #[must_use]
    pub fn normalize(name: &str) -> String {
        let lower = name.trim().to_lowercase();
        match lower.strip_suffix(COMPONENT_SUFFIX) {
            Some(stripped) if !stripped.is_empty() => stripped.to_string(),
            _ => lower,
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata the host keeps for a block family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockFamily {
    /// Full family URI
    pub uri: BlockUri,
    /// Declared category tags ("stone", "ore", ...)
    #[serde(default)]
    pub categories: Vec<String>,
}

impl BlockFamily {
    /// Creates a block family with the given categories.
    #[must_use]
    pub fn new<I, S>(uri: BlockUri, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            uri,
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }
}

/// Read-only view of one loaded item definition.
pub trait PrefabView {
    /// Canonical, module-qualified name.
    fn urn(&self) -> &ResourceUrn;

    /// Whether the definition carries a component of the given type.
    fn has_component(&self, component: &ComponentType) -> bool;

    /// Per-item ingredient names, if declared.
    fn crafting_ingredient(&self) -> Option<&CraftingIngredientComponent>;

    /// Marker-to-ingredient mapping carried by this definition, if any.
    fn component_to_ingredient(&self) -> Option<&ComponentToIngredientComponent>;

    /// Every recipe-bearing component on this definition.
    fn recipe_components(&self) -> Vec<RecipeComponent<'_>>;
}

/// Bulk enumeration of loaded item definitions.
pub trait PrefabSource {
    /// Concrete definition type.
    type Prefab: PrefabView;

    /// All loaded definitions.
    fn prefabs(&self) -> impl Iterator<Item = &Self::Prefab>;

    /// Resolves a declared component name to a registered type.
    ///
    /// Returns `None` when no such type is registered.
    fn resolve_component(&self, name: &str) -> Option<ComponentType>;
}

/// What the ingredient matcher needs to know about an item in a slot.
///
/// Prefab-backed and block-backed items are mutually exclusive kinds.
#[derive(Debug, Clone, Copy)]
pub enum ItemIdentity<'a> {
    /// An item instantiated from a prefab.
    Prefab {
        /// The prefab the item was created from
        urn: &'a ResourceUrn,
        /// Ingredient names carried by the item itself
        ingredient_ids: &'a [String],
    },
    /// An item standing in for a block.
    Block {
        /// The block family the item places
        family: &'a BlockFamily,
    },
}

impl ItemIdentity<'_> {
    /// Full canonical name (prefab URN or block family URI).
    #[must_use]
    pub fn canonical_name(&self) -> String {
        match self {
            Self::Prefab { urn, .. } => urn.to_string(),
            Self::Block { family } => family.uri.to_string(),
        }
    }

    /// Unqualified local name.
    #[must_use]
    pub fn short_name(&self) -> &str {
        match self {
            Self::Prefab { urn, .. } => urn.resource(),
            Self::Block { family } => family.uri.short_name(),
        }
    }
}

/// Read access to entity inventories.
pub trait InventoryAccess {
    /// Whether the entity has an inventory at all.
    fn has_inventory(&self, entity: EntityId) -> bool;

    /// Number of slots in the entity's inventory.
    fn slot_count(&self, entity: EntityId) -> usize;

    /// Item entity in a slot, if the slot is occupied.
    fn item_at(&self, entity: EntityId, slot: usize) -> Option<EntityId>;

    /// Stack size of an item entity.
    fn stack_count(&self, item: EntityId) -> u32;

    /// Identity of an item entity.
    fn item_identity(&self, item: EntityId) -> Option<ItemIdentity<'_>>;
}

/// Write access to entity inventories.
pub trait InventoryMutation {
    /// Removes `count` items from a slot.
    ///
    /// Returns an entity holding the removed items, or `None` when the host
    /// refuses the removal. When `destroy_on_zero` is set an emptied stack
    /// is destroyed.
    fn remove_from_slot(
        &mut self,
        entity: EntityId,
        slot: usize,
        count: u32,
        destroy_on_zero: bool,
    ) -> Option<EntityId>;

    /// Puts an item into the entity's inventory. Returns false if it did not fit.
    fn give_item(&mut self, entity: EntityId, item: EntityId) -> bool;

    /// Destroys an item entity that is no longer held anywhere.
    fn destroy_item(&mut self, item: EntityId);

    /// Returns previously removed items to a slot.
    ///
    /// Hosts that cannot target a slot fall back to [`Self::give_item`].
    fn restore_to_slot(&mut self, entity: EntityId, _slot: usize, item: EntityId) -> bool {
        self.give_item(entity, item)
    }
}

/// Creation of crafted products.
pub trait ItemFactory {
    /// Whether a prefab with this name is loaded.
    fn prefab_exists(&self, name: &str) -> bool;

    /// Instantiates a prefab.
    fn create_from_prefab(&mut self, name: &str) -> Option<EntityId>;

    /// Whether a block family with this name is registered.
    fn block_family_exists(&self, name: &str) -> bool;

    /// Instantiates an item entity for a block family.
    fn create_block_item(&mut self, name: &str) -> Option<EntityId>;
}

/// Delivery of crafting notifications to entities.
pub trait CraftedEvents {
    /// Sends the crafted notification to a freshly created product.
    fn send_crafted(&mut self, product: EntityId, event: &OnRecipeCrafted);

    /// Called once a craft has completed.
    fn recipe_crafted(&mut self, _crafter: EntityId, _recipe: &Recipe, _products: &[EntityId]) {}

    /// Called when a craft is abandoned after its inputs were chosen.
    fn craft_aborted(&mut self, _crafter: EntityId, _recipe: &Recipe) {}
}

/// Everything crafting execution needs from the host.
pub trait CraftingHost: InventoryAccess + InventoryMutation + ItemFactory + CraftedEvents {}

impl<T> CraftingHost for T where T: InventoryAccess + InventoryMutation + ItemFactory + CraftedEvents {}
