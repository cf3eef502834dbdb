//! # sv-core
//!
//! Core domain models and ports for settings-vault.
//!
//! This crate describes observable settings models, schema migration steps and the
//! ports the persistence engine talks to. It performs no I/O.

// Public module exports
pub mod app_dirs;
pub mod config;
pub mod migration;
pub mod model;
pub mod ports;
pub mod security;
pub mod settings;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use migration::{migration_fn, FnMigration, MigrationStep};
pub use model::{ChangeNotifier, EncryptedField, FieldChange, ObservableModel, Settings};
pub use settings::{MigrationPolicy, StoreError, LEGACY_SCHEMA_VERSION};
