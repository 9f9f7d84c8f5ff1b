//! # Tinker
//!
//! Command-line front end for the crafting content pipeline. Loads the
//! content packs named by `tinker.toml` and answers questions about them:
//! - `categories` - every category that holds a recipe
//! - `recipes` - recipes filed under a category
//! - `names` - ingredient aliases of an item
//! - `simulate` - craft every recipe of a category in a scratch inventory

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tinker_engine::prelude::*;
use tinker_gameplay::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "tinker")]
#[command(version)]
#[command(about = "Inspect and exercise crafting content", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every category that holds a recipe
    Categories,

    /// List the recipes filed under a category
    Recipes {
        /// Category name (case-insensitive)
        category: String,
    },

    /// Show the ingredient aliases of an item
    Names {
        /// Canonical item name, e.g. core:plank
        item: String,
    },

    /// Craft each recipe of a category from a freshly stocked inventory
    Simulate {
        /// Category name (case-insensitive)
        category: String,
    },
}

/// Main entry point.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CraftingConfig::load_from(&cli.config);

    // Initialize tracing
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_filter).context("invalid log filter")?,
    };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    info!("Tinker {} starting", env!("CARGO_PKG_VERSION"));

    let service = CraftingService::load(config).context("failed to load content")?;
    match cli.command {
        Commands::Categories => list_categories(&service),
        Commands::Recipes { category } => list_recipes(&service, &category),
        Commands::Names { item } => show_names(&service, &item),
        Commands::Simulate { category } => simulate(&service, &category)?,
    }

    Ok(())
}

fn list_categories(service: &CraftingService) {
    let store = service.store();
    for category in store.categories() {
        println!("{category} ({} recipes)", store.get_recipes(category).len());
    }
}

fn list_recipes(service: &CraftingService, category: &str) {
    let store = service.store();
    if !store.has_category(category) {
        warn!("No recipes in category {}", category);
        return;
    }
    for recipe in store.get_recipes(category) {
        let kind = match recipe.kind() {
            RecipeKind::List => "list",
            RecipeKind::Timed => "timed",
        };
        println!("[{kind}] {recipe}");
    }
}

fn show_names(service: &CraftingService, item: &str) {
    match service.store().get_ingredient_names(item) {
        Some(names) => println!("{item}: {}", names.join(", ")),
        None => println!("{item}: no aliases"),
    }
}

fn simulate(service: &CraftingService, category: &str) -> Result<()> {
    let manager = service.manager();
    let store = manager.store();
    let recipes = store.get_recipes(category);
    if recipes.is_empty() {
        warn!("No recipes in category {}", category);
        return Ok(());
    }

    let mut crafted = 0;
    for recipe in &recipes {
        let mut world = service.with_pack(ContentPack::to_world);
        let crafter = world.spawn_container(recipe.inputs().len() + 1);

        let mut stocked = true;
        for (slot, input) in recipe.inputs().iter().enumerate() {
            let sample = service.with_pack(|pack| sample_item(pack, store, &input.name));
            let Some(name) = sample else {
                println!("skip  {recipe}: nothing provides {}", input.name);
                stocked = false;
                break;
            };
            world
                .put_item(crafter, slot, &name, input.count)
                .with_context(|| format!("stocking {name}"))?;
        }
        if !stocked {
            continue;
        }

        match manager.try_craft(&mut world, crafter, recipe, true) {
            Ok(Some(products)) => {
                crafted += 1;
                println!("ok    {recipe}: {} products", products.len());
            },
            Ok(None) => println!("miss  {recipe}: inputs not matched"),
            Err(e) => println!("fail  {recipe}: {e}"),
        }
    }

    info!("Crafted {}/{} recipes in {}", crafted, recipes.len(), category);
    Ok(())
}

/// Finds a concrete item that satisfies an ingredient name.
fn sample_item(pack: &ContentPack, store: &RecipeStore, ingredient: &str) -> Option<String> {
    if let Some(prefab) = pack.catalog().resolve(ingredient) {
        return Some(prefab.name.to_string());
    }

    let families = pack.block_families();
    let mut short_names = families
        .iter()
        .filter(|family| eq_ignore_case(family.uri.short_name(), ingredient));
    if let (Some(family), None) = (short_names.next(), short_names.next()) {
        return Some(family.uri.to_string());
    }

    let aliased = pack.catalog().iter().find(|prefab| {
        let canonical = prefab.name.to_string();
        prefab
            .ingredient_ids()
            .iter()
            .any(|id| eq_ignore_case(id, ingredient))
            || store.ingredient_names().has_alias(&canonical, ingredient)
    });
    if let Some(prefab) = aliased {
        return Some(prefab.name.to_string());
    }

    families
        .into_iter()
        .find(|family| family.categories.iter().any(|c| eq_ignore_case(c, ingredient)))
        .map(|family| family.uri.to_string())
}
