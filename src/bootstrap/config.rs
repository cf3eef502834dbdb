//! Configuration loader.
//!
//! Reads the TOML file into [`AppConfig`]. Defaults for anything missing come
//! from the `serde(default)` attributes on the config types, not from here.

use std::io;
use std::path::Path;

use anyhow::Context;
use sv_core::config::AppConfig;
use tracing::debug;

/// Load configuration from a TOML file. A missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, or is not valid
/// TOML for [`AppConfig`].
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = match std::fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %config_path.display(), "no config file; using defaults");
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })
        }
    };

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}
