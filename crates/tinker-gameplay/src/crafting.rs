//! Crafting execution.
//!
//! [`CraftingManager`] ties the recipe store to a host: it finds input
//! slots, removes the inputs, creates the products and notifies them.
//! A craft that cannot happen right now (missing inputs, no inventory) is a
//! normal negative outcome and yields no products. [`CraftingError`] is kept
//! for host inconsistencies discovered mid-craft.

use std::sync::Arc;

use thiserror::Error;
use tinker_common::EntityId;
use tracing::{debug, warn};

use crate::events::OnRecipeCrafted;
use crate::host::{CraftingHost, InventoryAccess};
use crate::matching::IngredientMatcher;
use crate::recipes::Recipe;
use crate::slots::{self, SlotAssignment};
use crate::store::RecipeStore;

/// Crafting error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraftingError {
    /// Output names neither a prefab nor a block family
    #[error("Unknown recipe output: '{0}'")]
    UnknownOutput(String),
    /// Host refused to remove a chosen input
    #[error("Host refused to remove {count} from slot {slot}")]
    RemovalFailed {
        /// Slot chosen for the input
        slot: usize,
        /// Items requested
        count: u32,
    },
    /// Host failed to instantiate the output
    #[error("Failed to create '{0}'")]
    CreationFailed(String),
}

/// Result type for crafting operations.
pub type CraftingResult<T> = Result<T, CraftingError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputSource {
    Prefab,
    Block,
}

/// Crafts recipes from a [`RecipeStore`] against a host.
#[derive(Debug, Clone)]
pub struct CraftingManager {
    store: Arc<RecipeStore>,
    rollback_on_failure: bool,
}

impl CraftingManager {
    /// Creates a manager that rolls back partial removals.
    #[must_use]
    pub fn new(store: Arc<RecipeStore>) -> Self {
        Self {
            store,
            rollback_on_failure: true,
        }
    }

    /// Sets whether inputs already removed are returned when a later
    /// removal fails.
    #[must_use]
    pub const fn with_rollback(mut self, enabled: bool) -> Self {
        self.rollback_on_failure = enabled;
        self
    }

    /// The recipe store in use.
    #[must_use]
    pub fn store(&self) -> &RecipeStore {
        &self.store
    }

    /// Whether partial removals are rolled back.
    #[must_use]
    pub const fn rollback_on_failure(&self) -> bool {
        self.rollback_on_failure
    }

    /// A matcher over the store's alias index.
    #[must_use]
    pub fn matcher(&self) -> IngredientMatcher<'_> {
        IngredientMatcher::new(self.store.ingredient_names())
    }

    /// Finds input slots for a recipe in the crafter's inventory.
    pub fn find_slots<H>(&self, host: &H, crafter: EntityId, recipe: &Recipe) -> Option<SlotAssignment>
    where
        H: InventoryAccess + ?Sized,
    {
        slots::find_slots(host, &self.matcher(), crafter, recipe.inputs())
    }

    /// Whether the crafter currently holds every input.
    pub fn can_craft<H>(&self, host: &H, crafter: EntityId, recipe: &Recipe) -> bool
    where
        H: InventoryAccess + ?Sized,
    {
        self.find_slots(host, crafter, recipe).is_some()
    }

    /// Recipes of a category the crafter can make right now.
    pub fn craftable_recipes<H>(&self, host: &H, crafter: EntityId, category: &str) -> Vec<&Recipe>
    where
        H: InventoryAccess + ?Sized,
    {
        self.store
            .get_recipes(category)
            .into_iter()
            .filter(|recipe| self.can_craft(host, crafter, recipe))
            .collect()
    }

    /// Crafts a recipe, surfacing host failures.
    ///
    /// Returns `Ok(None)` when the crafter lacks the inputs. Products are
    /// notified with the consumed inputs, which are destroyed right after,
    /// and, if `give_to_crafter` is set, put into the crafter's inventory,
    /// where they may merge into an existing stack.
    pub fn try_craft<H>(
        &self,
        host: &mut H,
        crafter: EntityId,
        recipe: &Recipe,
        give_to_crafter: bool,
    ) -> CraftingResult<Option<Vec<EntityId>>>
    where
        H: CraftingHost + ?Sized,
    {
        let Some(assignment) = self.find_slots(&*host, crafter, recipe) else {
            debug!("{} cannot craft {}", crafter, recipe);
            return Ok(None);
        };

        let output = recipe.output();
        let source = if host.prefab_exists(output) {
            OutputSource::Prefab
        } else if host.block_family_exists(output) {
            OutputSource::Block
        } else {
            return Err(CraftingError::UnknownOutput(output.to_string()));
        };

        let mut removed = Vec::with_capacity(assignment.len());
        for (input, &slot) in recipe.inputs().iter().zip(assignment.slots()) {
            match host.remove_from_slot(crafter, slot, input.count, false) {
                Some(taken) => removed.push((slot, taken)),
                None => {
                    warn!(
                        "Removing {}x{} from slot {} of {} failed",
                        input.count, input.name, slot, crafter
                    );
                    self.abort(host, crafter, recipe, &removed, &[]);
                    return Err(CraftingError::RemovalFailed {
                        slot,
                        count: input.count,
                    });
                },
            }
        }

        let mut products = Vec::with_capacity(recipe.output_count() as usize);
        for _ in 0..recipe.output_count() {
            let product = match source {
                OutputSource::Prefab => host.create_from_prefab(output),
                OutputSource::Block => host.create_block_item(output),
            };
            match product {
                Some(product) => products.push(product),
                None => {
                    warn!("Creating '{}' for {} failed", output, crafter);
                    self.abort(host, crafter, recipe, &removed, &products);
                    return Err(CraftingError::CreationFailed(output.to_string()));
                },
            }
        }

        let event = OnRecipeCrafted::new(removed.iter().map(|&(_, taken)| taken).collect());
        for &product in &products {
            host.send_crafted(product, &event);
        }
        // Inputs are consumed once every product has seen them.
        for &(_, taken) in &removed {
            host.destroy_item(taken);
        }

        if give_to_crafter {
            for &product in &products {
                if !host.give_item(crafter, product) {
                    warn!("No room for {} in inventory of {}", product, crafter);
                }
            }
        }

        debug!("{} crafted {}", crafter, recipe);
        host.recipe_crafted(crafter, recipe, &products);
        Ok(Some(products))
    }

    /// Crafts a recipe, returning the products or nothing.
    pub fn craft_recipe<H>(
        &self,
        host: &mut H,
        crafter: EntityId,
        recipe: &Recipe,
        give_to_crafter: bool,
    ) -> Vec<EntityId>
    where
        H: CraftingHost + ?Sized,
    {
        match self.try_craft(host, crafter, recipe, give_to_crafter) {
            Ok(products) => products.unwrap_or_default(),
            Err(error) => {
                warn!("Crafting {} for {} failed: {}", recipe.output(), crafter, error);
                Vec::new()
            },
        }
    }

    fn abort<H>(
        &self,
        host: &mut H,
        crafter: EntityId,
        recipe: &Recipe,
        removed: &[(usize, EntityId)],
        created: &[EntityId],
    ) where
        H: CraftingHost + ?Sized,
    {
        for &product in created {
            host.destroy_item(product);
        }
        if self.rollback_on_failure {
            for &(slot, taken) in removed.iter().rev() {
                if !host.restore_to_slot(crafter, slot, taken) {
                    warn!("Could not return {} to slot {} of {}", taken, slot, crafter);
                }
            }
        } else if !removed.is_empty() {
            warn!("{} inputs removed from {} were not returned", removed.len(), crafter);
        }
        host.craft_aborted(crafter, recipe);
    }
}
