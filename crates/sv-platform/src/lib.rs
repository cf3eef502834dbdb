//! # sv-platform
//!
//! Platform-specific implementations for settings-vault.
//!
//! Everything here talks to the operating system: the user's keychain, the
//! local filesystem for headless secret storage, and the platform data directory.

pub mod app_dirs;
pub mod file_secure_storage;
pub mod secure_storage;
pub mod system_secure_storage;

pub use app_dirs::DirsAppDirsAdapter;
pub use file_secure_storage::FileSecureStorage;
pub use secure_storage::{create_secure_storage, SecureStorageFactoryError};
pub use system_secure_storage::SystemSecureStorage;
