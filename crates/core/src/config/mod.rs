//! Configuration for the Lua engine
//!
//! Settings live in a TOML file, by default
//! `configs/modules/ale.toml` next to the host binary:
//! - Type-safe struct via serde, every field optional in the file
//! - Default file generated on first load
//! - Manual reload
//!
//! # Example
//!
//! ```ignore
//! use ale_core::config::AleConfig;
//!
//! let config = AleConfig::load().unwrap_or_default();
//! if config.enabled {
//!     println!("Scripts from {}", config.script_path);
//! }
//! ```

mod loader;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::state::SearchPaths;

pub use loader::{ale_base_dir, ale_config_path, configs_dir};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Could not determine config directory from the host binary location
    #[error("Config directory not available - could not resolve host base path")]
    NoConfigDirectory,
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Engine configuration.
///
/// Loaded from `configs/modules/ale.toml`. Missing keys take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AleConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Master switch; when false the engine never initializes
    pub enabled: bool,

    /// Enable debug logging
    pub debug: bool,

    /// Reload scripts automatically when files change
    ///
    /// Accepted so existing config files parse; not acted on yet.
    pub auto_reload_enabled: bool,

    /// Seconds between file change checks
    ///
    /// Accepted so existing config files parse; not acted on yet.
    pub auto_reload_interval: u32,

    /// Keep compiled chunks between reloads
    ///
    /// Accepted so existing config files parse; not acted on yet.
    pub bytecode_cache_enabled: bool,

    /// Tell online players when scripts are reloaded
    ///
    /// Accepted so existing config files parse; not acted on yet.
    pub player_announce_reload: bool,

    /// Directory scanned for scripts
    pub script_path: String,

    /// Prepended to `package.path`
    pub require_path: String,

    /// Prepended to `package.cpath`
    pub require_cpath: String,
}

impl Default for AleConfig {
    fn default() -> Self {
        Self {
            version: 1,
            enabled: true,
            debug: false,
            auto_reload_enabled: false,
            auto_reload_interval: 1,
            bytecode_cache_enabled: true,
            player_announce_reload: false,
            script_path: "lua_scripts".to_string(),
            require_path: String::new(),
            require_cpath: String::new(),
        }
    }
}

impl AleConfig {
    /// Load config from the default path, creating it if missing.
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(ale_config_path()?)
    }

    /// Load config from `path`, creating a default file if missing.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::debug!("Loaded ALE config from {:?}", path);
            Ok(config)
        } else {
            let default = Self::default();
            default.save_to(path)?;
            tracing::info!("Created default ALE config at {:?}", path);
            Ok(default)
        }
    }

    /// Save config to `path`.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save_to(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved ALE config to {:?}", path);
        Ok(())
    }

    /// Reload config from `path`.
    ///
    /// On error the current values are kept.
    pub fn reload_from(&mut self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        *self = toml::from_str(&content)?;
        tracing::debug!("Reloaded ALE config from {:?}", path);
        Ok(())
    }

    /// Module search paths for new script states
    pub fn search_paths(&self) -> SearchPaths {
        SearchPaths {
            path: self.require_path.clone(),
            cpath: self.require_cpath.clone(),
        }
    }
}
