//! Content pack loading.
//!
//! This module provides:
//! - Loading prefab and block family definitions from `<content_path>/*.toml`
//! - Validation on load
//! - Hot-reload support for development
//! - [`ContentPack`], the loaded definitions as a [`PrefabSource`]

use ahash::AHashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tinker_gameplay::host::{BlockFamily, ComponentType, PrefabSource, PrefabView};
use tinker_gameplay::prefab::{PrefabCatalog, PrefabDefinition};
use tinker_gameplay::world::ItemWorld;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_CONTENT_PATH;

/// Errors that can occur during content loading.
#[derive(Debug, Error)]
pub enum ContentLoadError {
    /// File not found.
    #[error("Content file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read file.
    #[error("Failed to read content file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML.
    #[error("Failed to parse content TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Result type for content loading operations.
pub type ContentLoadResult<T> = Result<T, ContentLoadError>;

/// The definitions in a single content file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentFile {
    /// File format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Item definitions.
    #[serde(default)]
    pub prefabs: Vec<PrefabDefinition>,
    /// Block family definitions.
    #[serde(default)]
    pub block_families: Vec<BlockFamily>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

/// Every loaded definition, merged across files.
#[derive(Debug, Clone)]
pub struct ContentPack {
    catalog: PrefabCatalog,
    block_families: AHashMap<String, BlockFamily>,
}

impl ContentPack {
    /// Creates an empty pack.
    #[must_use]
    pub fn new() -> Self {
        Self {
            catalog: PrefabCatalog::new(),
            block_families: AHashMap::new(),
        }
    }

    /// The prefab catalog.
    #[must_use]
    pub const fn catalog(&self) -> &PrefabCatalog {
        &self.catalog
    }

    /// Block families, sorted by URI.
    #[must_use]
    pub fn block_families(&self) -> Vec<&BlockFamily> {
        let mut families: Vec<&BlockFamily> = self.block_families.values().collect();
        families.sort_by_key(|family| family.uri.key());
        families
    }

    /// Number of prefabs.
    #[must_use]
    pub fn prefab_count(&self) -> usize {
        self.catalog.len()
    }

    /// Number of block families.
    #[must_use]
    pub fn block_family_count(&self) -> usize {
        self.block_families.len()
    }

    /// Adds a prefab. Returns true if it replaced an earlier definition.
    pub fn add_prefab(&mut self, prefab: PrefabDefinition) -> bool {
        let replaced = self.catalog.contains(&prefab.name.to_string());
        self.catalog.insert(prefab);
        replaced
    }

    /// Adds a block family. Returns true if it replaced an earlier definition.
    pub fn add_block_family(&mut self, family: BlockFamily) -> bool {
        self.block_families.insert(family.uri.key(), family).is_some()
    }

    /// Builds an in-memory world holding this pack's definitions.
    #[must_use]
    pub fn to_world(&self) -> ItemWorld {
        let mut world = ItemWorld::new(self.catalog.clone());
        for family in self.block_families.values() {
            world.add_block_family(family.clone());
        }
        world
    }
}

impl Default for ContentPack {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefabSource for ContentPack {
    type Prefab = PrefabDefinition;

    fn prefabs(&self) -> impl Iterator<Item = &PrefabDefinition> {
        self.catalog.prefabs()
    }

    fn resolve_component(&self, name: &str) -> Option<ComponentType> {
        self.catalog.resolve_component(name)
    }
}

/// Statistics for the content loader.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContentLoaderStats {
    /// Number of files loaded.
    pub files_loaded: u32,
    /// Number of prefabs loaded.
    pub prefabs_loaded: u32,
    /// Number of block families loaded.
    pub block_families_loaded: u32,
    /// Number of validation errors.
    pub validation_errors: u32,
    /// Number of hot-reloads performed.
    pub hot_reloads: u32,
}

/// Content loader with hot-reload support.
pub struct ContentLoader {
    /// Base path for content files.
    base_path: PathBuf,
    /// Everything loaded so far.
    pack: ContentPack,
    /// Modification times for hot-reload detection.
    mod_times: AHashMap<PathBuf, SystemTime>,
    /// Whether hot-reload is enabled.
    hot_reload_enabled: bool,
    /// Statistics.
    stats: ContentLoaderStats,
}

impl ContentLoader {
    /// Creates a new content loader.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        info!("Initializing content loader at: {:?}", base_path);

        Self {
            base_path,
            pack: ContentPack::new(),
            mod_times: AHashMap::new(),
            hot_reload_enabled: cfg!(debug_assertions),
            stats: ContentLoaderStats::default(),
        }
    }

    /// Creates a loader with default path.
    #[must_use]
    pub fn with_default_path() -> Self {
        Self::new(DEFAULT_CONTENT_PATH)
    }

    /// Enables or disables hot-reload.
    #[must_use]
    pub fn with_hot_reload(mut self, enabled: bool) -> Self {
        self.hot_reload_enabled = enabled;
        self
    }

    /// Returns the base path.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the loaded content.
    #[must_use]
    pub const fn pack(&self) -> &ContentPack {
        &self.pack
    }

    /// Returns loader statistics.
    #[must_use]
    pub fn stats(&self) -> &ContentLoaderStats {
        &self.stats
    }

    /// Clears everything and loads all content files from the base path.
    ///
    /// Files are read in name order so later files override earlier ones
    /// deterministically.
    pub fn load_all(&mut self) -> ContentLoadResult<()> {
        self.pack = ContentPack::new();
        self.mod_times.clear();
        let hot_reloads = self.stats.hot_reloads;
        self.stats = ContentLoaderStats {
            hot_reloads,
            ..ContentLoaderStats::default()
        };

        if !self.base_path.exists() {
            info!(
                "Content directory does not exist, creating: {:?}",
                self.base_path
            );
            fs::create_dir_all(&self.base_path)?;
            return Ok(());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.base_path)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();

        for path in paths {
            if let Err(e) = self.load_file(&path) {
                warn!("Failed to load content file {:?}: {}", path, e);
                self.stats.validation_errors += 1;
            }
        }

        info!(
            "Loaded {} prefabs and {} block families from {} files",
            self.stats.prefabs_loaded, self.stats.block_families_loaded, self.stats.files_loaded
        );

        Ok(())
    }

    /// Loads definitions from a single file on top of what is loaded.
    pub fn load_file(&mut self, path: &Path) -> ContentLoadResult<()> {
        debug!("Loading content file: {:?}", path);

        if !path.exists() {
            return Err(ContentLoadError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let file: ContentFile = toml::from_str(&content)?;

        // Track modification time for hot-reload
        if let Ok(modified) = fs::metadata(path).and_then(|metadata| metadata.modified()) {
            self.mod_times.insert(path.to_path_buf(), modified);
        }

        for prefab in file.prefabs {
            self.stats.validation_errors += count_invalid_recipes(&prefab);
            let name = prefab.name.clone();
            if self.pack.add_prefab(prefab) {
                warn!("Prefab {} in {:?} replaces an earlier definition", name, path);
                self.stats.validation_errors += 1;
            } else {
                self.stats.prefabs_loaded += 1;
            }
        }

        for family in file.block_families {
            let uri = family.uri.clone();
            if self.pack.add_block_family(family) {
                warn!("Block family {} in {:?} replaces an earlier definition", uri, path);
                self.stats.validation_errors += 1;
            } else {
                self.stats.block_families_loaded += 1;
            }
        }

        self.stats.files_loaded += 1;
        Ok(())
    }

    /// Checks for modified files and reloads everything.
    ///
    /// Returns true if content was reloaded.
    pub fn check_hot_reload(&mut self) -> bool {
        if !self.hot_reload_enabled {
            return false;
        }

        let changed = self.mod_times.iter().find(|(path, previous)| {
            fs::metadata(path)
                .and_then(|metadata| metadata.modified())
                .map_or(true, |modified| modified > **previous)
        });
        let Some((path, _)) = changed else {
            return false;
        };

        info!("Hot-reloading content after change to {:?}", path);
        match self.load_all() {
            Ok(()) => {
                self.stats.hot_reloads += 1;
                true
            },
            Err(e) => {
                warn!("Hot-reload failed: {}", e);
                false
            },
        }
    }
}

/// Recipe bodies on a prefab that will be rejected at registration.
fn count_invalid_recipes(prefab: &PrefabDefinition) -> u32 {
    let invalid = prefab
        .recipe_components()
        .into_iter()
        .flat_map(|component| component.recipes())
        .filter(|(_, recipe)| recipe.is_err())
        .count();
    u32::try_from(invalid).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BASIC: &str = r#"
version = "1.0.0"

[[prefabs]]
name = "core:stick"

[[prefabs]]
name = "core:plank"
crafting_ingredient = { ingredient_ids = ["wood"] }

[[prefabs]]
name = "core:stickrecipes"

[prefabs.list_recipes.recipes."core:stick"]
inputs = { wood = 1 }
output_count = 4

[prefabs.list_recipes.recipes."core:broken"]
inputs = { wood = 0 }

[[block_families]]
uri = "core:cobble"
categories = ["stone"]
"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).expect("write content");
        path
    }

    #[test]
    fn test_parse_content_file() {
        let file: ContentFile = toml::from_str(BASIC).expect("parse");
        assert_eq!(file.version, "1.0.0");
        assert_eq!(file.prefabs.len(), 3);
        assert_eq!(file.block_families.len(), 1);
        assert_eq!(file.prefabs[1].ingredient_ids(), ["wood"]);
    }

    #[test]
    fn test_load_all_counts() {
        let dir = TempDir::new().expect("temp dir");
        write(&dir, "basic.toml", BASIC);
        write(&dir, "notes.txt", "not content");

        let mut loader = ContentLoader::new(dir.path());
        loader.load_all().expect("load");

        let stats = loader.stats();
        assert_eq!(stats.files_loaded, 1);
        assert_eq!(stats.prefabs_loaded, 3);
        assert_eq!(stats.block_families_loaded, 1);
        assert_eq!(stats.validation_errors, 1);
        assert!(loader.pack().catalog().contains("core:plank"));
        assert!(loader.pack().resolve_component("ListRecipes").is_some());
    }

    #[test]
    fn test_bad_file_is_counted_not_fatal() {
        let dir = TempDir::new().expect("temp dir");
        write(&dir, "a.toml", BASIC);
        write(&dir, "b.toml", "[[prefabs]]\nname = 5\n");

        let mut loader = ContentLoader::new(dir.path());
        loader.load_all().expect("load");
        assert_eq!(loader.stats().files_loaded, 1);
        assert_eq!(loader.stats().validation_errors, 2);
    }

    #[test]
    fn test_later_file_overrides_prefab() {
        let dir = TempDir::new().expect("temp dir");
        write(&dir, "a.toml", BASIC);
        write(
            &dir,
            "b.toml",
            "[[prefabs]]\nname = \"core:plank\"\ncrafting_ingredient = { ingredient_ids = [\"timber\"] }\n",
        );

        let mut loader = ContentLoader::new(dir.path());
        loader.load_all().expect("load");
        let plank = loader.pack().catalog().get("core:plank").expect("plank");
        assert_eq!(plank.ingredient_ids(), ["timber"]);
        assert_eq!(loader.pack().prefab_count(), 3);
    }

    #[test]
    fn test_missing_directory_is_created() {
        let dir = TempDir::new().expect("temp dir");
        let content = dir.path().join("content");

        let mut loader = ContentLoader::new(&content);
        loader.load_all().expect("load");
        assert!(content.exists());
        assert_eq!(loader.pack().prefab_count(), 0);
    }

    #[test]
    fn test_load_file_not_found() {
        let mut loader = ContentLoader::with_default_path();
        let result = loader.load_file(Path::new("/nonexistent/content.toml"));
        assert!(matches!(result, Err(ContentLoadError::NotFound(_))));
    }

    #[test]
    fn test_hot_reload_disabled() {
        let dir = TempDir::new().expect("temp dir");
        write(&dir, "basic.toml", BASIC);
        let mut loader = ContentLoader::new(dir.path()).with_hot_reload(false);
        loader.load_all().expect("load");
        assert!(!loader.check_hot_reload());
    }

    #[test]
    fn test_hot_reload_after_delete() {
        let dir = TempDir::new().expect("temp dir");
        let path = write(&dir, "basic.toml", BASIC);
        let mut loader = ContentLoader::new(dir.path()).with_hot_reload(true);
        loader.load_all().expect("load");
        assert!(!loader.check_hot_reload());

        fs::remove_file(path).expect("remove");
        assert!(loader.check_hot_reload());
        assert_eq!(loader.stats().hot_reloads, 1);
        assert_eq!(loader.pack().prefab_count(), 0);
    }

    #[test]
    fn test_pack_to_world() {
        let mut pack = ContentPack::new();
        pack.add_prefab(PrefabDefinition::new("core:stick".parse().expect("urn")));
        pack.add_block_family(BlockFamily::new("core:cobble".parse().expect("uri"), ["stone"]));

        let mut world = pack.to_world();
        let chest = world.spawn_container(2);
        assert!(world.put_item(chest, 0, "stick", 1).is_ok());
        assert!(world.put_item(chest, 1, "cobble", 1).is_ok());
        assert_eq!(pack.block_families().len(), 1);
    }
}
