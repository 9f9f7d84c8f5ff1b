//! Crafting service.
//!
//! Owns the content loader and the current recipe store. A reload builds a
//! fresh store off to the side and swaps it in, so handles taken with
//! [`CraftingService::store`] keep seeing a consistent snapshot.

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

use tinker_gameplay::crafting::CraftingManager;
use tinker_gameplay::store::{LoadReport, RecipeStore};
use tracing::{info, warn};

use crate::config::CraftingConfig;
use crate::content_loader::{ContentLoadResult, ContentLoader, ContentLoaderStats, ContentPack};

/// What a reload produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadSummary {
    /// Prefabs in the loaded pack
    pub prefabs: usize,
    /// Block families in the loaded pack
    pub block_families: usize,
    /// Canonical names with at least one alias
    pub aliased_items: usize,
    /// Categories holding at least one recipe
    pub categories: usize,
    /// Recipe registration outcome
    pub recipes: LoadReport,
}

/// Content, recipes and crafting configuration in one place.
pub struct CraftingService {
    config: CraftingConfig,
    loader: Mutex<ContentLoader>,
    store: RwLock<Arc<RecipeStore>>,
}

impl CraftingService {
    /// Creates a service with an empty store. Call [`Self::reload`] to load content.
    #[must_use]
    pub fn new(config: CraftingConfig) -> Self {
        let loader = ContentLoader::new(&config.content_path).with_hot_reload(config.hot_reload);
        Self {
            config,
            loader: Mutex::new(loader),
            store: RwLock::new(Arc::new(RecipeStore::default())),
        }
    }

    /// Creates a service and loads content immediately.
    pub fn load(config: CraftingConfig) -> ContentLoadResult<Self> {
        let service = Self::new(config);
        service.reload()?;
        Ok(service)
    }

    /// The configuration this service was built with.
    #[must_use]
    pub const fn config(&self) -> &CraftingConfig {
        &self.config
    }

    /// Reads all content from disk and rebuilds the recipe store.
    pub fn reload(&self) -> ContentLoadResult<ReloadSummary> {
        let mut loader = self.loader.lock();
        loader.load_all()?;
        Ok(self.rebuild(loader.pack()))
    }

    /// Reloads if any content file changed since the last load.
    ///
    /// Returns the new summary when a reload happened.
    pub fn poll_hot_reload(&self) -> Option<ReloadSummary> {
        let mut loader = self.loader.lock();
        if loader.check_hot_reload() {
            Some(self.rebuild(loader.pack()))
        } else {
            None
        }
    }

    /// Snapshot of the current recipe store.
    #[must_use]
    pub fn store(&self) -> Arc<RecipeStore> {
        Arc::clone(&self.store.read())
    }

    /// A crafting manager over the current store.
    #[must_use]
    pub fn manager(&self) -> CraftingManager {
        CraftingManager::new(self.store()).with_rollback(self.config.rollback_on_failure)
    }

    /// Runs `f` against the loaded content.
    pub fn with_pack<R>(&self, f: impl FnOnce(&ContentPack) -> R) -> R {
        f(self.loader.lock().pack())
    }

    /// Content loader statistics.
    #[must_use]
    pub fn stats(&self) -> ContentLoaderStats {
        self.loader.lock().stats().clone()
    }

    fn rebuild(&self, pack: &ContentPack) -> ReloadSummary {
        // Aliases are collected before recipes are registered.
        let mut builder =
            RecipeStore::builder().with_default_category(self.config.default_category.clone());
        builder.scrape_ingredient_names(pack);
        let report = builder.load_recipes(pack);
        let store = builder.build();

        for rejected in &report.rejected {
            warn!(
                "Skipped recipe {} on {}: {}",
                rejected.output, rejected.prefab, rejected.error
            );
        }

        let summary = ReloadSummary {
            prefabs: pack.prefab_count(),
            block_families: pack.block_family_count(),
            aliased_items: store.ingredient_names().len(),
            categories: store.categories().len(),
            recipes: report,
        };
        info!(
            "Recipe store rebuilt: {} recipes in {} categories",
            summary.recipes.loaded, summary.categories
        );

        *self.store.write() = Arc::new(store);
        summary
    }
}
