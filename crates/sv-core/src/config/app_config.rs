use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::settings::DEFAULT_SAVE_DEBOUNCE;

/// Application configuration
///
/// Every section and key is optional in the file; anything missing takes the
/// default below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub security: SecurityConfig,
    pub migration: MigrationConfig,
    pub logging: LoggingConfig,
}

/// Where settings files live and how eagerly they are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the settings files. Defaults to the platform data dir.
    pub settings_dir: Option<PathBuf>,

    /// Quiet interval before a burst of changes is written, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            settings_dir: None,
            debounce_ms: DEFAULT_SAVE_DEBOUNCE.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStorageKind {
    /// The OS keychain of the current user.
    #[default]
    System,
    /// Owner-only files under the data directory (headless fallback).
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub key_storage: KeyStorageKind,
    pub key_scope: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            key_storage: KeyStorageKind::System,
            key_scope: "default".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Refuse to open a store whose migration chain cannot reach the target version.
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write logs to a file under the data directory.
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { file: true }
    }
}
