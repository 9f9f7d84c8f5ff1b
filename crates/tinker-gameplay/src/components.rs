//! Declarative crafting components attached to item definitions.
//!
//! Content authors attach these to prefabs:
//! - [`CraftingIngredientComponent`] gives an item extra ingredient names
//! - [`ComponentToIngredientComponent`] gives every item carrying a marker
//!   component extra ingredient names
//! - [`ListRecipesComponent`] and [`TimedRecipesComponent`] declare recipes,
//!   keyed by output name, under one or more categories

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::recipes::{ListRecipe, Recipe, RecipeResult, TimedRecipe};

/// Category used when a recipe component declares none.
pub const DEFAULT_CATEGORY: &str = "InHand";

const fn default_output_count() -> u32 {
    1
}

/// Alternate names this item answers to in recipes.
///
/// The same name may be shared by many items ("wood" for every plank).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftingIngredientComponent {
    /// Extra ingredient names
    #[serde(default)]
    pub ingredient_ids: Vec<String>,
}

/// Maps a marker component name to ingredient names.
///
/// Every prefab carrying the marker inherits the names. Markers are written
/// as they appear on prefabs, so `Flammable` and `FlammableComponent` are the
/// same marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentToIngredientComponent {
    /// Marker component name to ingredient names
    #[serde(default)]
    pub component_map: BTreeMap<String, Vec<String>>,
}

/// Authoring shape of a single list recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRecipeContainer {
    /// Ingredient name to required count, in declaration order
    pub inputs: IndexMap<String, u32>,
    /// Number of outputs produced
    #[serde(default = "default_output_count")]
    pub output_count: u32,
}

impl ListRecipeContainer {
    /// Builds the recipe producing `output`.
    pub fn to_recipe(&self, output: &str) -> RecipeResult<ListRecipe> {
        ListRecipe::new(
            output,
            self.output_count,
            self.inputs.iter().map(|(name, count)| (name.as_str(), *count)),
        )
    }
}

/// Recipes crafted from a list of inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRecipesComponent {
    /// Categories the recipes are registered under, empty for the loader's default
    #[serde(default)]
    pub categories: Vec<String>,
    /// Output name to recipe body
    #[serde(default)]
    pub recipes: BTreeMap<String, ListRecipeContainer>,
}

/// Authoring shape of a single timed recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedRecipeContainer {
    /// Ingredient name to required count, in declaration order
    pub inputs: IndexMap<String, u32>,
    /// Number of outputs produced
    #[serde(default = "default_output_count")]
    pub output_count: u32,
    /// Processing time in game ticks
    #[serde(default)]
    pub duration_ticks: u32,
}

impl TimedRecipeContainer {
    /// Builds the recipe producing `output`.
    pub fn to_recipe(&self, output: &str) -> RecipeResult<TimedRecipe> {
        let recipe = ListRecipe::new(
            output,
            self.output_count,
            self.inputs.iter().map(|(name, count)| (name.as_str(), *count)),
        )?;
        Ok(TimedRecipe::new(recipe, self.duration_ticks))
    }
}

/// Recipes that need processing time, usually at a workstation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedRecipesComponent {
    /// Categories the recipes are registered under, empty for the loader's default
    #[serde(default)]
    pub categories: Vec<String>,
    /// Output name to recipe body
    #[serde(default)]
    pub recipes: BTreeMap<String, TimedRecipeContainer>,
}

/// A recipe-bearing component found on a prefab.
#[derive(Debug, Clone, Copy)]
pub enum RecipeComponent<'a> {
    /// A [`ListRecipesComponent`]
    List(&'a ListRecipesComponent),
    /// A [`TimedRecipesComponent`]
    Timed(&'a TimedRecipesComponent),
}

impl<'a> RecipeComponent<'a> {
    /// Categories to register every recipe of this component under.
    #[must_use]
    pub fn categories(&self) -> &'a [String] {
        match *self {
            Self::List(component) => &component.categories,
            Self::Timed(component) => &component.categories,
        }
    }

    /// Builds every recipe, paired with its output name.
    ///
    /// Invalid bodies are returned as errors so the caller decides whether
    /// to skip them.
    #[must_use]
    pub fn recipes(&self) -> Vec<(&'a str, RecipeResult<Recipe>)> {
        match *self {
            Self::List(component) => component
                .recipes
                .iter()
                .map(|(output, body)| (output.as_str(), body.to_recipe(output).map(Recipe::from)))
                .collect(),
            Self::Timed(component) => component
                .recipes
                .iter()
                .map(|(output, body)| (output.as_str(), body.to_recipe(output).map(Recipe::from)))
                .collect(),
        }
    }
}
