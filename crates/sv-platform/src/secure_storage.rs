//! Secure storage selection.

use std::path::Path;
use std::sync::Arc;

use sv_core::config::KeyStorageKind;
use sv_core::ports::SecureStoragePort;
use tracing::{debug, warn};

use crate::file_secure_storage::FileSecureStorage;
use crate::system_secure_storage::SystemSecureStorage;

#[derive(Debug, thiserror::Error)]
pub enum SecureStorageFactoryError {
    #[error("failed to initialize file-based secure storage: {0}")]
    FileBasedInit(#[from] std::io::Error),
}

/// Build the configured secure storage backend.
///
/// File storage lives under `<app_data_root>/keys`.
pub fn create_secure_storage(
    kind: KeyStorageKind,
    app_data_root: &Path,
) -> Result<Arc<dyn SecureStoragePort>, SecureStorageFactoryError> {
    match kind {
        KeyStorageKind::System => {
            debug!("using system keychain for field keys");
            Ok(Arc::new(SystemSecureStorage::new()))
        }
        KeyStorageKind::File => {
            warn!(
                path = %app_data_root.display(),
                "using file-based secure storage for field keys"
            );
            let storage = FileSecureStorage::new_in_app_data_root(app_data_root)?;
            Ok(Arc::new(storage))
        }
    }
}
