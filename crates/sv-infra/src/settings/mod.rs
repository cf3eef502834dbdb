//! The settings persistence engine.
//!
//! A [`SettingsStore`] owns one observable settings instance. It loads (or
//! recovers, or defaults) the instance at construction, runs migrations and field
//! decryption, then watches the instance and writes it back after a quiet
//! period, one save at a time, with a rolling backup and an atomic replace.

mod codec;
mod dispatch;
mod error;
mod field_crypto;
mod file;
mod loader;
mod migration;
mod registry;
mod store;

#[cfg(test)]
mod test_support;

pub use dispatch::BlockingPoolDispatcher;
pub use file::SettingsFile;
pub use loader::LoadSource;
pub use migration::{MigrationChain, MigrationOutcome};
pub use registry::SettingsRegistry;
pub use store::{SettingsStore, SettingsStoreBuilder};
