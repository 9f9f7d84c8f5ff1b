//! Ingredient alias index.
//!
//! Maps an item's canonical name to the extra names it answers to in
//! recipes. Two declaration styles feed it:
//! - a [`CraftingIngredientComponent`](crate::components::CraftingIngredientComponent)
//!   on the item itself
//! - a [`ComponentToIngredientComponent`](crate::components::ComponentToIngredientComponent)
//!   anywhere, applied to every item carrying the named marker component
//!
//! Keys are lowercased canonical names. Aliases keep their declared casing
//! and are deduplicated case-insensitively.

use ahash::AHashMap;
use tracing::{debug, trace};

use crate::host::{PrefabSource, PrefabView};
use crate::matching::eq_ignore_case;

/// Canonical name to alias list.
#[derive(Debug, Clone, Default)]
pub struct IngredientNames {
    names: AHashMap<String, Vec<String>>,
}

impl IngredientNames {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index by scanning every loaded definition.
    ///
    /// Marker names that resolve to no registered component type are
    /// skipped so one bad content declaration cannot abort the scan.
    #[must_use]
    pub fn scrape<S: PrefabSource>(source: &S) -> Self {
        let mut index = Self::new();

        for prefab in source.prefabs() {
            if let Some(ingredient) = prefab.crafting_ingredient() {
                for alias in &ingredient.ingredient_ids {
                    index.link(&prefab.urn().to_string(), alias);
                }
            }
        }

        for carrier in source.prefabs() {
            let Some(mapping) = carrier.component_to_ingredient() else {
                continue;
            };
            for (marker, aliases) in &mapping.component_map {
                let Some(component) = source.resolve_component(marker) else {
                    debug!(
                        "Skipping ingredient names for unknown component '{}' declared by {}",
                        marker,
                        carrier.urn()
                    );
                    continue;
                };
                for prefab in source.prefabs().filter(|p| p.has_component(&component)) {
                    for alias in aliases {
                        index.link(&prefab.urn().to_string(), alias);
                    }
                }
            }
        }

        debug!("Scraped ingredient names for {} items", index.len());
        index
    }

    /// Links an alias to a canonical name.
    pub fn link(&mut self, canonical: &str, alias: &str) {
        let alias = alias.trim();
        if alias.is_empty() {
            return;
        }
        let aliases = self.names.entry(canonical.to_lowercase()).or_default();
        if !aliases.iter().any(|known| eq_ignore_case(known, alias)) {
            trace!("Ingredient name '{}' -> {}", alias, canonical);
            aliases.push(alias.to_string());
        }
    }

    /// All aliases of a canonical name (case-insensitive lookup).
    #[must_use]
    pub fn get(&self, canonical: &str) -> Option<&[String]> {
        self.names
            .get(&canonical.to_lowercase())
            .map(Vec::as_slice)
    }

    /// Whether `alias` is one of the canonical name's aliases.
    #[must_use]
    pub fn has_alias(&self, canonical: &str, alias: &str) -> bool {
        self.get(canonical)
            .is_some_and(|aliases| aliases.iter().any(|known| eq_ignore_case(known, alias)))
    }

    /// Number of canonical names with at least one alias.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefab::{PrefabCatalog, PrefabDefinition};

    fn prefab(name: &str) -> PrefabDefinition {
        PrefabDefinition::new(name.parse().expect("valid urn"))
    }

    #[test]
    fn test_direct_aliases() {
        let catalog = PrefabCatalog::from_prefabs([
            prefab("core:plank").with_ingredient_ids(["wood", "Timber"]),
            prefab("core:stick"),
        ]);

        let names = IngredientNames::scrape(&catalog);
        assert_eq!(names.get("core:plank"), Some(["wood".to_string(), "Timber".to_string()].as_slice()));
        assert_eq!(names.get("CORE:PLANK").map(<[String]>::len), Some(2));
        assert!(names.get("core:stick").is_none());
        assert!(names.has_alias("core:plank", "TIMBER"));
    }

    #[test]
    fn test_marker_component_aliases() {
        let catalog = PrefabCatalog::from_prefabs([
            prefab("core:coal").with_component("Flammable"),
            prefab("core:plank").with_component("FlammableComponent"),
            prefab("core:stone"),
            prefab("core:fuelrules").with_component_alias("Flammable", ["fuel"]),
        ]);

        let names = IngredientNames::scrape(&catalog);
        assert!(names.has_alias("core:coal", "fuel"));
        assert!(names.has_alias("core:plank", "Fuel"));
        assert!(!names.has_alias("core:stone", "fuel"));
    }

    #[test]
    fn test_unknown_marker_is_skipped() {
        let catalog = PrefabCatalog::from_prefabs([
            prefab("core:coal").with_component("Flammable"),
            prefab("core:rules")
                .with_component_alias("Magnetic", ["metal"])
                .with_component_alias("Flammable", ["fuel"]),
        ]);

        let names = IngredientNames::scrape(&catalog);
        assert!(names.has_alias("core:coal", "fuel"));
        assert!(!names.has_alias("core:coal", "metal"));
    }

    #[test]
    fn test_both_styles_merge_without_duplicates() {
        let catalog = PrefabCatalog::from_prefabs([
            prefab("core:plank")
                .with_component("Flammable")
                .with_ingredient_ids(["wood", "fuel"]),
            prefab("core:rules").with_component_alias("Flammable", ["FUEL", "burnable"]),
        ]);

        let names = IngredientNames::scrape(&catalog);
        assert_eq!(
            names.get("core:plank"),
            Some(
                [
                    "wood".to_string(),
                    "fuel".to_string(),
                    "burnable".to_string()
                ]
                .as_slice()
            )
        );
    }

    #[test]
    fn test_rescrape_replaces_index() {
        let mut catalog = PrefabCatalog::from_prefabs([prefab("core:plank").with_ingredient_ids(["wood"])]);
        let first = IngredientNames::scrape(&catalog);
        assert!(first.has_alias("core:plank", "wood"));

        catalog.insert(prefab("core:plank"));
        let second = IngredientNames::scrape(&catalog);
        assert!(second.is_empty());
    }

    #[test]
    fn test_link_ignores_blank_aliases() {
        let mut names = IngredientNames::new();
        names.link("core:plank", "  ");
        assert!(names.is_empty());
    }
}
