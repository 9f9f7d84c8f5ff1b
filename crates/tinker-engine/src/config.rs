//! Crafting configuration.
//!
//! Where content lives, how recipes without categories are filed, and how
//! crafting reacts to host failures. Loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tinker_gameplay::components::DEFAULT_CATEGORY;
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "tinker.toml";

/// Default content directory.
pub const DEFAULT_CONTENT_PATH: &str = "assets/content";

/// Default tracing filter directive.
pub const DEFAULT_LOG_FILTER: &str = "tinker=info";

/// Crafting configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CraftingConfig {
    /// Directory scanned for `*.toml` content packs
    pub content_path: PathBuf,
    /// Category for recipe components that declare none
    pub default_category: String,
    /// Return removed inputs when a later removal fails
    pub rollback_on_failure: bool,
    /// Reload content when files change
    pub hot_reload: bool,
    /// Tracing filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for CraftingConfig {
    fn default() -> Self {
        Self {
            content_path: PathBuf::from(DEFAULT_CONTENT_PATH),
            default_category: DEFAULT_CATEGORY.to_string(),
            rollback_on_failure: true,
            hot_reload: cfg!(debug_assertions),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl CraftingConfig {
    /// Load configuration from `tinker.toml` in the working directory.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                info!("Loaded config from {}", path.display());
                config.validate();
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Replace blank values with defaults.
    pub fn validate(&mut self) {
        if self.content_path.as_os_str().is_empty() {
            self.content_path = PathBuf::from(DEFAULT_CONTENT_PATH);
        }
        if self.default_category.trim().is_empty() {
            self.default_category = DEFAULT_CATEGORY.to_string();
        }
        if self.log_filter.trim().is_empty() {
            self.log_filter = DEFAULT_LOG_FILTER.to_string();
        }
    }
}
