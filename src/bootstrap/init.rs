use anyhow::Context;
use sv_core::ports::AppDirsPort;
use sv_platform::DirsAppDirsAdapter;
use tracing::debug;

use super::config::load_config;
use super::context::SettingsContext;
use super::paths::AppPaths;
use super::tracing::init_tracing_subscriber;

/// Resolve directories, load `config.toml`, start logging and build the
/// settings context.
pub fn bootstrap() -> anyhow::Result<SettingsContext> {
    let app_dirs = DirsAppDirsAdapter::new()
        .get_app_dirs()
        .context("Failed to resolve application data directory")?;
    let base_paths = AppPaths::from_app_dirs(&app_dirs);

    let config = load_config(&base_paths.config_path)?;
    let paths = base_paths.with_storage_config(&config.storage);

    let logs_dir = config.logging.file.then_some(paths.logs_dir.as_path());
    init_tracing_subscriber(logs_dir)?;
    debug!(config = ?config, "configuration loaded");

    SettingsContext::new(config, paths)
}
