use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sv_core::config::AppConfig;
use sv_core::ports::FieldCipherPort;
use sv_core::security::KeyScope;
use sv_core::{MigrationPolicy, ObservableModel, Settings, StoreError};
use sv_infra::{
    FieldKeyMaterial, SettingsRegistry, SettingsStore, SettingsStoreBuilder, XChaChaFieldCipher,
};
use sv_platform::create_secure_storage;
use tracing::info;

use super::paths::AppPaths;

/// Everything a component needs to open and reach settings stores.
///
/// Constructed once at startup and passed down explicitly.
pub struct SettingsContext {
    config: AppConfig,
    paths: AppPaths,
    cipher: Arc<dyn FieldCipherPort>,
    registry: SettingsRegistry,
}

impl SettingsContext {
    /// Build the context, provisioning the field key from the configured
    /// secure storage.
    pub fn new(config: AppConfig, paths: AppPaths) -> anyhow::Result<Self> {
        let storage = create_secure_storage(config.security.key_storage, &paths.app_data_root)
            .context("Failed to initialize secure storage")?;
        let scope = KeyScope::new(config.security.key_scope.clone());
        let key = FieldKeyMaterial::new(storage, scope)
            .load_or_create()
            .context("Failed to load field encryption key")?;
        let cipher =
            XChaChaFieldCipher::new(&key).context("Failed to initialize field cipher")?;

        info!(
            settings_dir = %paths.settings_dir.display(),
            key_storage = ?config.security.key_storage,
            "settings context ready"
        );

        Ok(Self::with_cipher(config, paths, Arc::new(cipher)))
    }

    /// Build the context around an existing cipher.
    pub fn with_cipher(
        config: AppConfig,
        paths: AppPaths,
        cipher: Arc<dyn FieldCipherPort>,
    ) -> Self {
        Self {
            config,
            paths,
            cipher,
            registry: SettingsRegistry::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    pub fn settings_path(&self, file_name: &str) -> PathBuf {
        self.paths.settings_file(file_name)
    }

    /// A store builder for `file_name` in the settings directory, carrying the
    /// configured cipher, debounce interval and migration policy.
    pub fn store_builder<T: ObservableModel>(
        &self,
        file_name: &str,
        current_version: u32,
    ) -> SettingsStoreBuilder<T> {
        SettingsStore::builder(self.settings_path(file_name), current_version)
            .cipher(Arc::clone(&self.cipher))
            .debounce(Duration::from_millis(self.config.storage.debounce_ms))
            .migration_policy(MigrationPolicy::from_strict(self.config.migration.strict))
    }

    pub fn register<T: ObservableModel>(
        &mut self,
        store: SettingsStore<T>,
    ) -> Result<(), StoreError> {
        self.registry.insert(store)
    }

    pub fn registry(&self) -> &SettingsRegistry {
        &self.registry
    }

    pub fn store<T: ObservableModel>(&self) -> Option<&SettingsStore<T>> {
        self.registry.get::<T>()
    }

    pub fn settings<T: ObservableModel>(&self) -> Option<Settings<T>> {
        self.registry.settings::<T>()
    }

    /// Write every pending change. Call before the process exits.
    pub async fn flush_all(&self) {
        self.registry.flush_all().await;
    }
}

impl fmt::Debug for SettingsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsContext")
            .field("config", &self.config)
            .field("paths", &self.paths)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
