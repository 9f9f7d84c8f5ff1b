//! Loaded item definitions.
//!
//! A [`PrefabDefinition`] is the crafting-relevant slice of a host prefab:
//! its name, the marker components it carries and any crafting components.
//! [`PrefabCatalog`] holds the full set and answers component-name lookups.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tinker_common::ResourceUrn;

use crate::components::{
    ComponentToIngredientComponent, CraftingIngredientComponent, ListRecipesComponent,
    RecipeComponent, TimedRecipesComponent,
};
use crate::host::{ComponentType, PrefabSource, PrefabView};
use crate::matching::eq_ignore_case;

/// Component types every catalog knows about.
const BUILTIN_COMPONENTS: &[&str] = &[
    "Item",
    "BlockItem",
    "CraftingIngredient",
    "ComponentToIngredient",
    "ListRecipes",
    "TimedRecipes",
];

/// A single loaded item definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefabDefinition {
    /// Canonical name
    pub name: ResourceUrn,
    /// Marker component names carried by this prefab
    #[serde(default)]
    pub components: Vec<String>,
    /// Extra ingredient names
    #[serde(default)]
    pub crafting_ingredient: Option<CraftingIngredientComponent>,
    /// Marker-to-ingredient declarations
    #[serde(default)]
    pub component_to_ingredient: Option<ComponentToIngredientComponent>,
    /// List recipes declared on this prefab
    #[serde(default)]
    pub list_recipes: Option<ListRecipesComponent>,
    /// Timed recipes declared on this prefab
    #[serde(default)]
    pub timed_recipes: Option<TimedRecipesComponent>,
}

impl PrefabDefinition {
    /// Creates a bare definition with no components.
    #[must_use]
    pub fn new(name: ResourceUrn) -> Self {
        Self {
            name,
            components: Vec::new(),
            crafting_ingredient: None,
            component_to_ingredient: None,
            list_recipes: None,
            timed_recipes: None,
        }
    }

    /// Adds a marker component.
    #[must_use]
    pub fn with_component(mut self, name: impl Into<String>) -> Self {
        self.components.push(name.into());
        self
    }

    /// Sets the per-item ingredient names.
    #[must_use]
    pub fn with_ingredient_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.crafting_ingredient = Some(CraftingIngredientComponent {
            ingredient_ids: ids.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Adds a marker-to-ingredient mapping.
    #[must_use]
    pub fn with_component_alias<I, S>(mut self, component: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.component_to_ingredient
            .get_or_insert_with(ComponentToIngredientComponent::default)
            .component_map
            .insert(component.into(), names.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the list recipes.
    #[must_use]
    pub fn with_list_recipes(mut self, recipes: ListRecipesComponent) -> Self {
        self.list_recipes = Some(recipes);
        self
    }

    /// Sets the timed recipes.
    #[must_use]
    pub fn with_timed_recipes(mut self, recipes: TimedRecipesComponent) -> Self {
        self.timed_recipes = Some(recipes);
        self
    }

    /// Ingredient names carried by items created from this prefab.
    #[must_use]
    pub fn ingredient_ids(&self) -> &[String] {
        self.crafting_ingredient
            .as_ref()
            .map(|c| c.ingredient_ids.as_slice())
            .unwrap_or_default()
    }

    /// Every component type this definition carries, markers and crafting
    /// components alike.
    fn component_types(&self) -> impl Iterator<Item = ComponentType> + '_ {
        let crafting = [
            self.crafting_ingredient.as_ref().map(|_| "CraftingIngredient"),
            self.component_to_ingredient
                .as_ref()
                .map(|_| "ComponentToIngredient"),
            self.list_recipes.as_ref().map(|_| "ListRecipes"),
            self.timed_recipes.as_ref().map(|_| "TimedRecipes"),
        ];
        self.components
            .iter()
            .map(String::as_str)
            .chain(crafting.into_iter().flatten())
            .map(ComponentType::new)
    }
}

impl PrefabView for PrefabDefinition {
    fn urn(&self) -> &ResourceUrn {
        &self.name
    }

    fn has_component(&self, component: &ComponentType) -> bool {
        self.component_types().any(|ty| &ty == component)
    }

    fn crafting_ingredient(&self) -> Option<&CraftingIngredientComponent> {
        self.crafting_ingredient.as_ref()
    }

    fn component_to_ingredient(&self) -> Option<&ComponentToIngredientComponent> {
        self.component_to_ingredient.as_ref()
    }

    fn recipe_components(&self) -> Vec<RecipeComponent<'_>> {
        let mut components = Vec::new();
        if let Some(list) = &self.list_recipes {
            components.push(RecipeComponent::List(list));
        }
        if let Some(timed) = &self.timed_recipes {
            components.push(RecipeComponent::Timed(timed));
        }
        components
    }
}

/// The set of loaded item definitions.
///
/// A component name is registered when any loaded prefab carries it or it
/// is one of the built-in crafting components.
#[derive(Debug, Clone, Default)]
pub struct PrefabCatalog {
    prefabs: Vec<PrefabDefinition>,
    by_name: AHashMap<String, usize>,
    component_types: AHashMap<String, ComponentType>,
}

impl PrefabCatalog {
    /// Creates a catalog holding only the built-in component types.
    #[must_use]
    pub fn new() -> Self {
        let mut catalog = Self::default();
        for name in BUILTIN_COMPONENTS {
            catalog.register_component(name);
        }
        catalog
    }

    /// Creates a catalog from a list of definitions.
    #[must_use]
    pub fn from_prefabs(prefabs: impl IntoIterator<Item = PrefabDefinition>) -> Self {
        let mut catalog = Self::new();
        for prefab in prefabs {
            catalog.insert(prefab);
        }
        catalog
    }

    /// Registers a component type that no prefab carries yet.
    pub fn register_component(&mut self, name: &str) {
        let ty = ComponentType::new(name);
        self.component_types.insert(ty.name().to_string(), ty);
    }

    /// Adds or replaces a definition.
    pub fn insert(&mut self, prefab: PrefabDefinition) {
        for ty in prefab.component_types() {
            self.component_types.insert(ty.name().to_string(), ty);
        }

        let key = prefab.name.key();
        match self.by_name.get(&key) {
            Some(&index) => self.prefabs[index] = prefab,
            None => {
                self.by_name.insert(key, self.prefabs.len());
                self.prefabs.push(prefab);
            },
        }
    }

    /// Looks up a definition by full name (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PrefabDefinition> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&index| &self.prefabs[index])
    }

    /// Whether a definition with this full name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(&name.to_lowercase())
    }

    /// Looks up a definition by full name, or by short name when exactly
    /// one module defines it.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&PrefabDefinition> {
        if let Some(prefab) = self.get(name) {
            return Some(prefab);
        }
        let mut candidates = self
            .prefabs
            .iter()
            .filter(|prefab| eq_ignore_case(prefab.name.resource(), name));
        match (candidates.next(), candidates.next()) {
            (Some(prefab), None) => Some(prefab),
            _ => None,
        }
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prefabs.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefabs.is_empty()
    }

    /// Iterates definitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PrefabDefinition> {
        self.prefabs.iter()
    }
}

impl PrefabSource for PrefabCatalog {
    type Prefab = PrefabDefinition;

    fn prefabs(&self) -> impl Iterator<Item = &PrefabDefinition> {
        self.prefabs.iter()
    }

    fn resolve_component(&self, name: &str) -> Option<ComponentType> {
        self.component_types
            .get(&ComponentType::normalize(name))
            .cloned()
    }
}
