//! Ingredient name resolution.
//!
//! A recipe names its inputs with free text. An item in a slot satisfies an
//! input when any of these hold (all case-insensitive):
//! 1. the text is the item's full canonical name
//! 2. the text is the item's short name
//! 3. the text is an alias: declared on the item itself (prefab items), one
//!    of the family's categories (block items), or linked in the
//!    [`IngredientNames`] index

use crate::host::ItemIdentity;
use crate::ingredients::IngredientNames;

/// Case-insensitive string equality.
///
/// Compares full Unicode lowercase mappings so `"Ä"` and `"ä"` agree.
#[must_use]
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

fn contains_ignore_case(names: &[String], requested: &str) -> bool {
    names.iter().any(|name| eq_ignore_case(name, requested))
}

/// Decides whether an item satisfies a recipe input name.
#[derive(Debug, Clone, Copy)]
pub struct IngredientMatcher<'a> {
    names: &'a IngredientNames,
}

impl<'a> IngredientMatcher<'a> {
    /// Creates a matcher backed by an alias index.
    #[must_use]
    pub const fn new(names: &'a IngredientNames) -> Self {
        Self { names }
    }

    /// Whether `item` can stand in for `requested`.
    #[must_use]
    pub fn matches(&self, item: &ItemIdentity<'_>, requested: &str) -> bool {
        Self::is_exact(item, requested)
            || Self::is_short_name(item, requested)
            || self.is_alias(item, requested)
    }

    /// Full canonical name comparison.
    #[must_use]
    pub fn is_exact(item: &ItemIdentity<'_>, requested: &str) -> bool {
        eq_ignore_case(&item.canonical_name(), requested)
    }

    /// Unqualified name comparison.
    #[must_use]
    pub fn is_short_name(item: &ItemIdentity<'_>, requested: &str) -> bool {
        eq_ignore_case(item.short_name(), requested)
    }

    /// Alias comparison: item-level names or block categories, then the index.
    #[must_use]
    pub fn is_alias(&self, item: &ItemIdentity<'_>, requested: &str) -> bool {
        let declared = match item {
            ItemIdentity::Prefab { ingredient_ids, .. } => {
                contains_ignore_case(ingredient_ids, requested)
            },
            ItemIdentity::Block { family } => contains_ignore_case(&family.categories, requested),
        };

        declared || self.names.has_alias(&item.canonical_name(), requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::BlockFamily;
    use proptest::prelude::*;
    use tinker_common::ResourceUrn;

    #[test]
    fn test_eq_ignore_case() {
        assert!(eq_ignore_case("Iron", "IRON"));
        assert!(eq_ignore_case("Äpfel", "äPFEL"));
        assert!(!eq_ignore_case("iron", "iro"));
    }

    #[test]
    fn test_exact_and_short_name() {
        let names = IngredientNames::new();
        let matcher = IngredientMatcher::new(&names);
        let urn = ResourceUrn::new("core", "stick");
        let item = ItemIdentity::Prefab {
            urn: &urn,
            ingredient_ids: &[],
        };

        assert!(IngredientMatcher::is_exact(&item, "CORE:Stick"));
        assert!(!IngredientMatcher::is_exact(&item, "stick"));
        assert!(IngredientMatcher::is_short_name(&item, "Stick"));
        assert!(matcher.matches(&item, "stick"));
        assert!(!matcher.matches(&item, "stone"));
        assert!(!matcher.matches(&item, "other:stickk"));
    }

    #[test]
    fn test_item_level_alias() {
        let names = IngredientNames::new();
        let matcher = IngredientMatcher::new(&names);
        let urn = ResourceUrn::new("core", "oakplank");
        let ids = ["wood".to_string()];
        let item = ItemIdentity::Prefab {
            urn: &urn,
            ingredient_ids: &ids,
        };

        assert!(matcher.is_alias(&item, "WOOD"));
        assert!(matcher.matches(&item, "wood"));
    }

    #[test]
    fn test_index_alias() {
        let mut names = IngredientNames::new();
        names.link("core:plank", "wood");
        let matcher = IngredientMatcher::new(&names);
        let urn = ResourceUrn::new("core", "plank");
        let item = ItemIdentity::Prefab {
            urn: &urn,
            ingredient_ids: &[],
        };

        assert!(!IngredientMatcher::is_exact(&item, "wood"));
        assert!(!IngredientMatcher::is_short_name(&item, "wood"));
        assert!(matcher.is_alias(&item, "wood"));
    }

    #[test]
    fn test_block_categories_and_index() {
        let mut names = IngredientNames::new();
        names.link("core:granite", "rock");
        let matcher = IngredientMatcher::new(&names);
        let family = BlockFamily::new("core:granite".parse().expect("uri"), ["stone"]);
        let item = ItemIdentity::Block { family: &family };

        assert!(matcher.matches(&item, "core:granite"));
        assert!(matcher.matches(&item, "granite"));
        assert!(matcher.matches(&item, "Stone"));
        assert!(matcher.matches(&item, "rock"));
        assert!(!matcher.matches(&item, "ore"));
    }

    proptest! {
        #[test]
        fn prop_match_is_case_symmetric(name in "[a-zA-Z]{1,12}", alias in "[a-zA-Z]{1,12}") {
            let mut names = IngredientNames::new();
            names.link("core:item", &alias);
            let matcher = IngredientMatcher::new(&names);
            let urn = ResourceUrn::new("core", "item");
            let item = ItemIdentity::Prefab { urn: &urn, ingredient_ids: &[] };

            let upper = matcher.matches(&item, &name.to_uppercase());
            let lower = matcher.matches(&item, &name.to_lowercase());
            prop_assert_eq!(upper, lower);
        }
    }
}
