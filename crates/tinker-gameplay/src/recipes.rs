//! Recipe definitions.
//!
//! This module provides:
//! - Ingredients as free-text names with a required count
//! - List recipes (unordered inputs, one output)
//! - Timed recipes (list recipes that take processing time)
//! - The closed [`Recipe`] sum type and its [`RecipeKind`] tag

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Reasons a recipe definition is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    /// Output name is empty
    #[error("Recipe has no output")]
    MissingOutput,
    /// Recipe declares no inputs
    #[error("Recipe for '{output}' has no inputs")]
    NoInputs {
        /// Output of the rejected recipe
        output: String,
    },
    /// An input has a zero count
    #[error("Recipe for '{output}' needs zero of '{ingredient}'")]
    ZeroInputCount {
        /// Output of the rejected recipe
        output: String,
        /// Offending ingredient name
        ingredient: String,
    },
    /// Output count is zero
    #[error("Recipe for '{output}' produces nothing")]
    ZeroOutputCount {
        /// Output of the rejected recipe
        output: String,
    },
}

/// Result type for recipe construction.
pub type RecipeResult<T> = Result<T, RecipeError>;

/// One input row of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Free-text ingredient name (full name, short name or alias)
    pub name: String,
    /// Quantity consumed
    pub count: u32,
}

impl Ingredient {
    /// Creates a new ingredient requirement.
    #[must_use]
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// A recipe whose inputs are a flat list of ingredients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRecipe {
    inputs: Vec<Ingredient>,
    output: String,
    output_count: u32,
}

impl ListRecipe {
    /// Creates a list recipe, rejecting empty inputs and zero counts.
    pub fn new<I, S>(output: impl Into<String>, output_count: u32, inputs: I) -> RecipeResult<Self>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let output = output.into();
        if output.trim().is_empty() {
            return Err(RecipeError::MissingOutput);
        }
        if output_count == 0 {
            return Err(RecipeError::ZeroOutputCount { output });
        }

        let inputs: Vec<Ingredient> = inputs
            .into_iter()
            .map(|(name, count)| Ingredient::new(name, count))
            .collect();
        if inputs.is_empty() {
            return Err(RecipeError::NoInputs { output });
        }
        if let Some(zero) = inputs.iter().find(|i| i.count == 0) {
            return Err(RecipeError::ZeroInputCount {
                output,
                ingredient: zero.name.clone(),
            });
        }

        Ok(Self {
            inputs,
            output,
            output_count,
        })
    }

    /// Input rows in declaration order.
    #[must_use]
    pub fn inputs(&self) -> &[Ingredient] {
        &self.inputs
    }

    /// Ingredient names in declaration order.
    pub fn input_items(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().map(|i| i.name.as_str())
    }

    /// Ingredient counts in declaration order.
    pub fn input_counts(&self) -> impl Iterator<Item = u32> + '_ {
        self.inputs.iter().map(|i| i.count)
    }

    /// Name of the produced item or block family.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Number of output instances produced per craft.
    #[must_use]
    pub const fn output_count(&self) -> u32 {
        self.output_count
    }
}

impl fmt::Display for ListRecipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, input) in self.inputs.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}x{}", input.count, input.name)?;
        }
        write!(f, " = {}x{}", self.output_count, self.output)
    }
}

/// A list recipe that needs processing time at a workstation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedRecipe {
    recipe: ListRecipe,
    duration_ticks: u32,
}

impl TimedRecipe {
    /// Wraps a list recipe with a processing duration.
    #[must_use]
    pub const fn new(recipe: ListRecipe, duration_ticks: u32) -> Self {
        Self {
            recipe,
            duration_ticks,
        }
    }

    /// The underlying list of inputs and output.
    #[must_use]
    pub const fn recipe(&self) -> &ListRecipe {
        &self.recipe
    }

    /// Processing time in game ticks.
    #[must_use]
    pub const fn duration_ticks(&self) -> u32 {
        self.duration_ticks
    }
}

impl fmt::Display for TimedRecipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} ticks)", self.recipe, self.duration_ticks)
    }
}

/// Tag naming a concrete recipe variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecipeKind {
    /// [`ListRecipe`]
    List,
    /// [`TimedRecipe`]
    Timed,
}

/// Every recipe variant the store can hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipe {
    /// Instant list crafting.
    List(ListRecipe),
    /// List crafting with processing time.
    Timed(TimedRecipe),
}

impl Recipe {
    /// The concrete variant tag.
    #[must_use]
    pub const fn kind(&self) -> RecipeKind {
        match self {
            Self::List(_) => RecipeKind::List,
            Self::Timed(_) => RecipeKind::Timed,
        }
    }

    /// The input list shared by every variant.
    #[must_use]
    pub fn as_list_recipe(&self) -> &ListRecipe {
        match self {
            Self::List(recipe) => recipe,
            Self::Timed(timed) => timed.recipe(),
        }
    }

    /// Input rows in declaration order.
    #[must_use]
    pub fn inputs(&self) -> &[Ingredient] {
        self.as_list_recipe().inputs()
    }

    /// Name of the produced item or block family.
    #[must_use]
    pub fn output(&self) -> &str {
        self.as_list_recipe().output()
    }

    /// Number of output instances produced per craft.
    #[must_use]
    pub fn output_count(&self) -> u32 {
        self.as_list_recipe().output_count()
    }

    /// Returns the recipe only if it is exactly a [`Recipe::List`].
    #[must_use]
    pub const fn as_list(&self) -> Option<&ListRecipe> {
        match self {
            Self::List(recipe) => Some(recipe),
            Self::Timed(_) => None,
        }
    }

    /// Returns the recipe only if it is exactly a [`Recipe::Timed`].
    #[must_use]
    pub const fn as_timed(&self) -> Option<&TimedRecipe> {
        match self {
            Self::Timed(recipe) => Some(recipe),
            Self::List(_) => None,
        }
    }
}

impl From<ListRecipe> for Recipe {
    fn from(recipe: ListRecipe) -> Self {
        Self::List(recipe)
    }
}

impl From<TimedRecipe> for Recipe {
    fn from(recipe: TimedRecipe) -> Self {
        Self::Timed(recipe)
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(recipe) => recipe.fmt(f),
            Self::Timed(recipe) => recipe.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stone_axe() -> ListRecipe {
        ListRecipe::new("core:stoneaxe", 1, [("stick", 1), ("stone", 1)]).expect("valid recipe")
    }

    #[test]
    fn test_list_recipe_keeps_input_order() {
        let recipe = stone_axe();
        assert_eq!(recipe.input_items().collect::<Vec<_>>(), ["stick", "stone"]);
        assert_eq!(recipe.input_counts().collect::<Vec<_>>(), [1, 1]);
        assert_eq!(recipe.output(), "core:stoneaxe");
        assert_eq!(recipe.output_count(), 1);
    }

    #[test]
    fn test_list_recipe_display() {
        assert_eq!(stone_axe().to_string(), "1xstick + 1xstone = 1xcore:stoneaxe");
    }

    #[test]
    fn test_list_recipe_rejects_zero_counts() {
        let result = ListRecipe::new("core:torch", 4, [("stick", 1), ("coal", 0)]);
        assert_eq!(
            result,
            Err(RecipeError::ZeroInputCount {
                output: "core:torch".to_string(),
                ingredient: "coal".to_string(),
            })
        );

        let result = ListRecipe::new("core:torch", 0, [("stick", 1)]);
        assert!(matches!(result, Err(RecipeError::ZeroOutputCount { .. })));
    }

    #[test]
    fn test_list_recipe_rejects_empty() {
        let result = ListRecipe::new("core:air", 1, Vec::<(String, u32)>::new());
        assert!(matches!(result, Err(RecipeError::NoInputs { .. })));
        assert_eq!(
            ListRecipe::new(" ", 1, [("stick", 1)]),
            Err(RecipeError::MissingOutput)
        );
    }

    #[test]
    fn test_recipe_kind_is_exact() {
        let list = Recipe::from(stone_axe());
        let timed = Recipe::from(TimedRecipe::new(stone_axe(), 120));

        assert_eq!(list.kind(), RecipeKind::List);
        assert_eq!(timed.kind(), RecipeKind::Timed);
        assert!(list.as_list().is_some());
        assert!(timed.as_list().is_none());
        assert!(timed.as_timed().is_some());

        // Both variants expose the same inputs.
        assert_eq!(list.inputs(), timed.inputs());
        assert_eq!(timed.output_count(), 1);
    }

    #[test]
    fn test_timed_recipe_display() {
        let timed = TimedRecipe::new(stone_axe(), 120);
        assert_eq!(
            timed.to_string(),
            "1xstick + 1xstone = 1xcore:stoneaxe (120 ticks)"
        );
    }
}
