//! Config path resolution
//!
//! Handles resolving paths for configuration files based on the host binary's location.

use std::path::PathBuf;

use super::{ConfigError, ConfigResult};

/// Returns the directory containing the host server binary.
///
/// The server runs from:
/// `<install>/bin/worldserver`
///
/// so this resolves to `<install>/bin/`, where the host keeps its `configs/`.
pub fn ale_base_dir() -> ConfigResult<PathBuf> {
    let exe = std::env::current_exe().map_err(ConfigError::IoError)?;

    exe.parent()
        .map(PathBuf::from)
        .ok_or(ConfigError::NoConfigDirectory)
}

/// Returns the base configs directory.
///
/// Path: `<install>/bin/configs/`
pub fn configs_dir() -> ConfigResult<PathBuf> {
    Ok(ale_base_dir()?.join("configs"))
}

/// Returns the engine config path.
///
/// Path: `<install>/bin/configs/modules/ale.toml`
pub fn ale_config_path() -> ConfigResult<PathBuf> {
    Ok(configs_dir()?.join("modules").join("ale.toml"))
}
