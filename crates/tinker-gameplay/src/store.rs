//! Recipe store.
//!
//! Built in two phases. A [`RecipeStoreBuilder`] collects recipes and the
//! ingredient alias index while content loads; [`RecipeStoreBuilder::build`]
//! freezes everything into a read-only [`RecipeStore`] for the session.
//!
//! Recipes live in one list and keep their [`RecipeId`] for the store's
//! lifetime. Categories are lowercased and map to sets of ids, so a recipe
//! registered under many categories is stored once.

use ahash::AHashMap;
use std::collections::BTreeSet;
use tinker_common::RecipeId;
use tracing::{debug, info, warn};

use crate::components::DEFAULT_CATEGORY;
use crate::host::{PrefabSource, PrefabView};
use crate::ingredients::IngredientNames;
use crate::recipes::{ListRecipe, Recipe, RecipeError, RecipeKind};

/// A recipe definition rejected at load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecipe {
    /// Prefab declaring the recipe
    pub prefab: String,
    /// Declared output name
    pub output: String,
    /// Why it was rejected
    pub error: RecipeError,
}

/// Outcome of [`RecipeStoreBuilder::load_recipes`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Recipes registered
    pub loaded: usize,
    /// Definitions skipped as invalid
    pub rejected: Vec<RejectedRecipe>,
}

/// Mutable phase of the recipe store.
#[derive(Debug, Clone)]
pub struct RecipeStoreBuilder {
    recipes: Vec<Recipe>,
    categories: AHashMap<String, BTreeSet<RecipeId>>,
    by_output: AHashMap<String, Vec<RecipeId>>,
    ingredient_names: IngredientNames,
    default_category: String,
}

impl Default for RecipeStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeStoreBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            recipes: Vec::new(),
            categories: AHashMap::new(),
            by_output: AHashMap::new(),
            ingredient_names: IngredientNames::new(),
            default_category: DEFAULT_CATEGORY.to_string(),
        }
    }

    /// Category used for recipe components that list no categories.
    #[must_use]
    pub fn with_default_category(mut self, category: impl Into<String>) -> Self {
        self.default_category = category.into();
        self
    }

    /// Registers a recipe under each category.
    ///
    /// Unlike a plain append, a recipe equal to one already stored reuses
    /// the existing id and only gains the new categories. Registering under
    /// a category twice is a no-op.
    pub fn put_recipe<I, S>(&mut self, recipe: impl Into<Recipe>, categories: I) -> RecipeId
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let recipe = recipe.into();
        let output_key = recipe.output().to_lowercase();

        let existing = self.by_output.get(&output_key).and_then(|ids| {
            ids.iter()
                .copied()
                .find(|id| self.recipes[id.index()] == recipe)
        });
        let id = match existing {
            Some(id) => id,
            None => {
                let id = RecipeId::new(self.recipes.len() as u32);
                self.recipes.push(recipe);
                self.by_output.entry(output_key).or_default().push(id);
                id
            },
        };

        for category in categories {
            self.categories
                .entry(category.as_ref().to_lowercase())
                .or_default()
                .insert(id);
        }
        id
    }

    /// Registers every recipe declared by the source's prefabs.
    ///
    /// Invalid definitions are logged and skipped.
    pub fn load_recipes<S: PrefabSource>(&mut self, source: &S) -> LoadReport {
        let mut report = LoadReport::default();

        for prefab in source.prefabs() {
            for component in prefab.recipe_components() {
                let categories = match component.categories() {
                    [] => vec![self.default_category.clone()],
                    declared => declared.to_vec(),
                };

                for (output, built) in component.recipes() {
                    match built {
                        Ok(recipe) => {
                            let id = self.put_recipe(recipe, &categories);
                            debug!("Registered {} from {} under {:?}", id, prefab.urn(), categories);
                            report.loaded += 1;
                        },
                        Err(error) => {
                            warn!("Skipping recipe '{}' on {}: {}", output, prefab.urn(), error);
                            report.rejected.push(RejectedRecipe {
                                prefab: prefab.urn().to_string(),
                                output: output.to_string(),
                                error,
                            });
                        },
                    }
                }
            }
        }

        info!(
            "Loaded {} recipes ({} rejected) in {} categories",
            report.loaded,
            report.rejected.len(),
            self.categories.len()
        );
        report
    }

    /// Rebuilds the ingredient alias index from the source.
    pub fn scrape_ingredient_names<S: PrefabSource>(&mut self, source: &S) {
        self.ingredient_names = IngredientNames::scrape(source);
    }

    /// Replaces the ingredient alias index.
    pub fn set_ingredient_names(&mut self, names: IngredientNames) {
        self.ingredient_names = names;
    }

    /// Number of distinct recipes collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Whether no recipes were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Freezes the builder into a read-only store.
    #[must_use]
    pub fn build(self) -> RecipeStore {
        RecipeStore {
            recipes: self.recipes,
            categories: self.categories,
            ingredient_names: self.ingredient_names,
        }
    }
}

/// Read-only recipe registry.
#[derive(Debug, Clone, Default)]
pub struct RecipeStore {
    recipes: Vec<Recipe>,
    categories: AHashMap<String, BTreeSet<RecipeId>>,
    ingredient_names: IngredientNames,
}

impl RecipeStore {
    /// Starts a new store.
    #[must_use]
    pub fn builder() -> RecipeStoreBuilder {
        RecipeStoreBuilder::new()
    }

    /// Whether any recipe is registered under the category (case-insensitive).
    #[must_use]
    pub fn has_category(&self, category: &str) -> bool {
        self.categories
            .get(&category.to_lowercase())
            .is_some_and(|ids| !ids.is_empty())
    }

    /// Recipe by id.
    #[must_use]
    pub fn get(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.get(id.index())
    }

    /// Ids registered under any of the categories, deduplicated and sorted.
    #[must_use]
    pub fn recipe_ids_in<I, S>(&self, categories: I) -> BTreeSet<RecipeId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        categories
            .into_iter()
            .filter_map(|category| self.categories.get(&category.as_ref().to_lowercase()))
            .flatten()
            .copied()
            .collect()
    }

    /// Recipes registered under a category. Empty when the category is unknown.
    #[must_use]
    pub fn get_recipes(&self, category: &str) -> Vec<&Recipe> {
        self.get_recipes_in([category])
    }

    /// Recipes registered under any of the categories, each once.
    #[must_use]
    pub fn get_recipes_in<I, S>(&self, categories: I) -> Vec<&Recipe>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.recipe_ids_in(categories)
            .into_iter()
            .filter_map(|id| self.get(id))
            .collect()
    }

    /// Like [`Self::get_recipes_in`], keeping only recipes of exactly `kind`.
    #[must_use]
    pub fn get_recipes_of_kind<I, S>(&self, categories: I, kind: RecipeKind) -> Vec<&Recipe>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.get_recipes_in(categories)
            .into_iter()
            .filter(|recipe| recipe.kind() == kind)
            .collect()
    }

    /// Plain list recipes under any of the categories.
    #[must_use]
    pub fn list_recipes_in<I, S>(&self, categories: I) -> Vec<&ListRecipe>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.get_recipes_in(categories)
            .into_iter()
            .filter_map(Recipe::as_list)
            .collect()
    }

    /// Aliases linked to an item's canonical name.
    #[must_use]
    pub fn get_ingredient_names(&self, canonical: &str) -> Option<&[String]> {
        self.ingredient_names.get(canonical)
    }

    /// The alias index.
    #[must_use]
    pub const fn ingredient_names(&self) -> &IngredientNames {
        &self.ingredient_names
    }

    /// Registered category keys, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.categories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// All recipes with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (RecipeId, &Recipe)> {
        self.recipes
            .iter()
            .enumerate()
            .map(|(index, recipe)| (RecipeId::new(index as u32), recipe))
    }

    /// Number of distinct recipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Whether the store holds no recipes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
