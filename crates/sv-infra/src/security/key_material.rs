use std::sync::Arc;

use sv_core::ports::{SecureStorageError, SecureStoragePort};
use sv_core::security::{FieldKey, KeyMaterialError, KeyScope};
use tracing::{debug, info};
use zeroize::Zeroize;

/// Loads the field key for a scope from secure storage, creating it on first use.
pub struct FieldKeyMaterial {
    storage: Arc<dyn SecureStoragePort>,
    scope: KeyScope,
}

impl FieldKeyMaterial {
    pub fn new(storage: Arc<dyn SecureStoragePort>, scope: KeyScope) -> Self {
        Self { storage, scope }
    }

    pub fn scope(&self) -> &KeyScope {
        &self.scope
    }

    /// Return the stored key, or generate and store a new one if none exists.
    ///
    /// A stored value of the wrong size is reported as corrupt and left in
    /// place: replacing it would make every existing ciphertext unreadable.
    pub fn load_or_create(&self) -> Result<FieldKey, KeyMaterialError> {
        let name = self.scope.storage_key();

        if let Some(mut bytes) = self.storage.get(&name).map_err(storage_error)? {
            let key = FieldKey::from_bytes(&bytes);
            bytes.zeroize();
            debug!(scope = %self.scope.profile_id, "loaded field key");
            return key;
        }

        let key = FieldKey::generate()?;
        self.storage
            .set(&name, key.as_bytes())
            .map_err(storage_error)?;
        info!(scope = %self.scope.profile_id, "created field key");

        Ok(key)
    }

    pub fn delete(&self) -> Result<(), KeyMaterialError> {
        self.storage
            .delete(&self.scope.storage_key())
            .map_err(storage_error)
    }
}

fn storage_error(err: SecureStorageError) -> KeyMaterialError {
    match err {
        SecureStorageError::Corrupt(msg) => KeyMaterialError::Corrupt(msg),
        other => KeyMaterialError::Storage(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    mockall::mock! {
        Storage {}

        impl SecureStoragePort for Storage {
            fn get(&self, key: &str) -> Result<Option<Vec<u8>>, SecureStorageError>;
            fn set(&self, key: &str, value: &[u8]) -> Result<(), SecureStorageError>;
            fn delete(&self, key: &str) -> Result<(), SecureStorageError>;
        }
    }

    #[derive(Default)]
    struct MemoryStorage {
        entries: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl SecureStoragePort for MemoryStorage {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, SecureStorageError> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        fn set(&self, key: &str, value: &[u8]) -> Result<(), SecureStorageError> {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_vec());
            Ok(())
        }

        fn delete(&self, key: &str) -> Result<(), SecureStorageError> {
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[test]
    fn key_is_created_once_and_reused() {
        let storage = Arc::new(MemoryStorage::default());
        let material = FieldKeyMaterial::new(storage.clone(), KeyScope::new("work"));

        let first = material.load_or_create().unwrap();
        let second = material.load_or_create().unwrap();

        assert_eq!(first, second);
        assert!(storage
            .entries
            .lock()
            .unwrap()
            .contains_key("settings-field-key:v1:work"));
    }

    #[test]
    fn scopes_get_distinct_keys() {
        let storage = Arc::new(MemoryStorage::default());

        let work = FieldKeyMaterial::new(storage.clone(), KeyScope::new("work"))
            .load_or_create()
            .unwrap();
        let home = FieldKeyMaterial::new(storage, KeyScope::new("home"))
            .load_or_create()
            .unwrap();

        assert_ne!(work, home);
    }

    #[test]
    fn wrong_length_key_is_corrupt_and_not_replaced() {
        let mut storage = MockStorage::new();
        storage
            .expect_get()
            .returning(|_| Ok(Some(vec![1u8; 8])));
        storage.expect_set().never();

        let material = FieldKeyMaterial::new(Arc::new(storage), KeyScope::default());

        assert!(matches!(
            material.load_or_create(),
            Err(KeyMaterialError::Corrupt(_))
        ));
    }

    #[test]
    fn storage_failure_is_reported() {
        let mut storage = MockStorage::new();
        storage
            .expect_get()
            .returning(|_| Err(SecureStorageError::Unavailable("no keychain".into())));

        let material = FieldKeyMaterial::new(Arc::new(storage), KeyScope::default());

        assert!(matches!(
            material.load_or_create(),
            Err(KeyMaterialError::Storage(_))
        ));
    }

    #[test]
    fn delete_removes_the_entry() {
        let storage = Arc::new(MemoryStorage::default());
        let material = FieldKeyMaterial::new(storage.clone(), KeyScope::default());
        material.load_or_create().unwrap();

        material.delete().unwrap();

        assert!(storage.entries.lock().unwrap().is_empty());
    }
}
