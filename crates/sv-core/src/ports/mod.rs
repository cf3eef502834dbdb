//! Port interfaces for the persistence engine
//!
//! Ports define the contract between the settings engine and the infrastructure
//! or platform implementations behind it. The engine only ever talks to these
//! traits, so encryption backends, secret storage and write scheduling can be
//! swapped without touching the load/save algorithm.

pub mod app_dirs;
pub mod errors;
pub mod security;
mod write_dispatcher;

pub use app_dirs::AppDirsPort;
pub use errors::AppDirsError;
pub use security::field_cipher::FieldCipherPort;
pub use security::secure_storage::{SecureStorageError, SecureStoragePort};
pub use write_dispatcher::{WriteDispatcherPort, WriteJob};
