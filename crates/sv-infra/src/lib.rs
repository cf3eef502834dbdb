pub mod security;
pub mod settings;

pub use security::{FieldKeyMaterial, XChaChaFieldCipher};
pub use settings::{
    BlockingPoolDispatcher, LoadSource, SettingsFile, SettingsRegistry, SettingsStore,
    SettingsStoreBuilder,
};
