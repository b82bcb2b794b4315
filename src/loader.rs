//! Config file discovery and loading.
//!
//! Handles finding the config file across different platforms and loading it.
//! The search order is:
//!
//! 1. `$XDG_CONFIG_HOME/key2pane/config.{json,toml}`
//! 2. `~/.config/key2pane/config.{json,toml}`
//! 3. Platform default (e.g., `~/Library/Application Support` on macOS)

use crate::config::RawConfig;
use crate::error::{Key2PaneError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "key2pane";
const CONFIG_FILES: [&str; 2] = ["config.json", "config.toml"];

/// Return the first existing config file inside `dir`, if any.
fn existing_config(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| dir.join(APP_DIR).join(name))
        .find(|path| path.exists())
}

/// Determine the config file path.
///
/// Checks locations in order of preference:
/// 1. `$XDG_CONFIG_HOME/key2pane/` (if XDG_CONFIG_HOME is set)
/// 2. `~/.config/key2pane/` (common on Linux, often used on macOS)
/// 3. Platform default via `dirs::config_dir()`
///
/// In each directory `config.json` wins over `config.toml`. If no existing
/// config is found, returns `~/.config/key2pane/config.json`.
///
/// # Errors
///
/// Returns [`Key2PaneError::NoConfigDir`] if the home directory cannot be determined.
pub fn default_config_path() -> Result<PathBuf> {
    let home_config = dirs::home_dir().map(|home| home.join(".config"));

    let candidates = [
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        home_config.clone(),
        dirs::config_dir(),
    ];
    if let Some(path) = candidates.iter().flatten().find_map(|dir| existing_config(dir)) {
        return Ok(path);
    }

    home_config
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILES[0]))
        .ok_or(Key2PaneError::NoConfigDir)
}

/// Load and parse a config file from the given path.
///
/// The document is returned as parsed; settings are validated later, when
/// they are resolved.
///
/// # Errors
///
/// - [`Key2PaneError::ConfigNotFound`] if the file doesn't exist
/// - [`Key2PaneError::Io`] if reading fails
/// - [`Key2PaneError::ConfigInvalid`] if parsing fails
pub fn load_config(path: &Path) -> Result<RawConfig> {
    if !path.exists() {
        return Err(Key2PaneError::ConfigNotFound(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path)?;
    let config = RawConfig::parse(path, &contents).map_err(|source| {
        Key2PaneError::ConfigInvalid {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!(path = %path.display(), keys = config.values.len(), "loaded config");
    Ok(config)
}
