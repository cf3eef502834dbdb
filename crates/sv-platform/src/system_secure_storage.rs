use keyring::Entry;
use sv_core::ports::{SecureStorageError, SecureStoragePort};

const SERVICE_NAME: &str = "settings-vault";

/// Secure storage in the current user's OS keychain.
///
/// Entries are readable only by the account that wrote them, which is what
/// scopes field ciphertext to one user and machine.
#[derive(Debug, Clone, Default)]
pub struct SystemSecureStorage;

impl SystemSecureStorage {
    pub fn new() -> Self {
        Self
    }

    fn entry_for_key(&self, key: &str) -> Result<Entry, SecureStorageError> {
        Entry::new(SERVICE_NAME, key).map_err(|e| {
            SecureStorageError::Unavailable(format!("failed to open keychain entry: {e}"))
        })
    }
}

fn map_keyring_error(context: &str, err: keyring::Error) -> SecureStorageError {
    match err {
        keyring::Error::PlatformFailure(msg) => {
            SecureStorageError::PermissionDenied(msg.to_string())
        }
        keyring::Error::NoStorageAccess(msg) => SecureStorageError::Unavailable(msg.to_string()),
        keyring::Error::BadEncoding(_) => {
            SecureStorageError::Corrupt(format!("{context}: stored secret is not valid"))
        }
        other => SecureStorageError::Other(format!("{context}: {other}")),
    }
}

impl SecureStoragePort for SystemSecureStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, SecureStorageError> {
        let entry = self.entry_for_key(key)?;
        match entry.get_secret() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(map_keyring_error("failed to read keychain", err)),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), SecureStorageError> {
        self.entry_for_key(key)?
            .set_secret(value)
            .map_err(|err| map_keyring_error("failed to write keychain", err))
    }

    fn delete(&self, key: &str) -> Result<(), SecureStorageError> {
        let entry = self.entry_for_key(key)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(map_keyring_error("failed to delete keychain entry", err)),
        }
    }
}
