//! # Tinker Gameplay
//!
//! Item crafting for a voxel engine.
//!
//! This crate provides the crafting domain logic on top of host-provided
//! entities, prefabs and inventories:
//! - Recipe model (list and timed recipes)
//! - Declarative crafting components for content authors
//! - Ingredient alias index
//! - Recipe store with category lookup
//! - Ingredient matching and slot allocation
//! - Crafting execution with crafted notifications
//! - Host traits, plus an in-memory host for tools and tests

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod components;
pub mod crafting;
pub mod events;
pub mod host;
pub mod ingredients;
pub mod inventory;
pub mod matching;
pub mod prefab;
pub mod recipes;
pub mod slots;
pub mod store;
pub mod world;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::components::*;
    pub use crate::crafting::*;
    pub use crate::events::*;
    pub use crate::host::*;
    pub use crate::ingredients::*;
    pub use crate::inventory::*;
    pub use crate::matching::*;
    pub use crate::prefab::*;
    pub use crate::recipes::*;
    pub use crate::slots::{find_slots, SlotAssignment};
    pub use crate::store::*;
    pub use crate::world::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_load_then_craft() {
        let catalog = PrefabCatalog::from_prefabs([
            PrefabDefinition::new("core:plank".parse().expect("urn")).with_ingredient_ids(["wood"]),
            PrefabDefinition::new("core:stick".parse().expect("urn")).with_list_recipes(ListRecipesComponent {
                categories: vec!["InHand".to_string()],
                recipes: [(
                    "core:stick".to_string(),
                    ListRecipeContainer {
                        inputs: [("wood".to_string(), 2)].into_iter().collect(),
                        output_count: 4,
                    },
                )]
                .into_iter()
                .collect(),
            }),
        ]);

        let mut builder = RecipeStore::builder();
        builder.scrape_ingredient_names(&catalog);
        builder.load_recipes(&catalog);
        let manager = CraftingManager::new(Arc::new(builder.build()));

        let mut world = ItemWorld::new(catalog);
        let crafter = world.spawn_container(4);
        world.put_item(crafter, 0, "plank", 2).expect("put");

        let recipe = manager.store().get_recipes("InHand")[0].clone();
        let products = manager.craft_recipe(&mut world, crafter, &recipe, true);
        assert_eq!(products.len(), 4);
        assert_eq!(world.count_of(crafter, "stick"), 4);
        assert_eq!(world.count_of(crafter, "plank"), 0);
    }
}
