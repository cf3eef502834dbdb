use std::path::PathBuf;

use sv_core::app_dirs::AppDirs;
use sv_core::config::StorageConfig;

/// Concrete locations derived from the application data root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub app_data_root: PathBuf,
    pub config_path: PathBuf,
    pub settings_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl AppPaths {
    pub fn from_app_dirs(dirs: &AppDirs) -> Self {
        Self {
            app_data_root: dirs.app_data_root.clone(),
            config_path: dirs.app_data_root.join("config.toml"),
            settings_dir: dirs.app_data_root.join("settings"),
            logs_dir: dirs.app_data_root.join("logs"),
        }
    }

    /// Apply `[storage] settings_dir` from the configuration, if set.
    pub fn with_storage_config(mut self, storage: &StorageConfig) -> Self {
        if let Some(dir) = &storage.settings_dir {
            self.settings_dir = dir.clone();
        }
        self
    }

    pub fn settings_file(&self, file_name: &str) -> PathBuf {
        self.settings_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dirs() -> AppDirs {
        AppDirs {
            app_data_root: PathBuf::from("/tmp/settings-vault"),
        }
    }

    #[test]
    fn derives_locations_from_app_data_root() {
        let paths = AppPaths::from_app_dirs(&dirs());

        assert_eq!(paths.config_path, PathBuf::from("/tmp/settings-vault/config.toml"));
        assert_eq!(paths.settings_dir, PathBuf::from("/tmp/settings-vault/settings"));
        assert_eq!(paths.logs_dir, PathBuf::from("/tmp/settings-vault/logs"));
        assert_eq!(
            paths.settings_file("app.json"),
            PathBuf::from("/tmp/settings-vault/settings/app.json")
        );
    }

    #[test]
    fn configured_settings_dir_wins() {
        let storage = StorageConfig {
            settings_dir: Some(PathBuf::from("/srv/settings")),
            ..StorageConfig::default()
        };

        let paths = AppPaths::from_app_dirs(&dirs()).with_storage_config(&storage);

        assert_eq!(paths.settings_dir, PathBuf::from("/srv/settings"));
        assert_eq!(paths.logs_dir, PathBuf::from("/tmp/settings-vault/logs"));
    }
}
