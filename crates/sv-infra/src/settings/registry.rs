use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use sv_core::{ObservableModel, Settings, StoreError};
use tracing::debug;

use super::store::SettingsStore;

#[async_trait]
trait ErasedStore: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn path(&self) -> &Path;
    async fn flush(&self);
}

#[async_trait]
impl<T: ObservableModel> ErasedStore for SettingsStore<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn path(&self) -> &Path {
        SettingsStore::path(self)
    }

    async fn flush(&self) {
        SettingsStore::flush(self).await;
    }
}

/// Owned collection of stores, one per settings type.
///
/// Built once at startup and passed to whatever needs settings.
#[derive(Default)]
pub struct SettingsRegistry {
    stores: HashMap<TypeId, Box<dyn ErasedStore>>,
}

impl SettingsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T: ObservableModel>(
        &mut self,
        store: SettingsStore<T>,
    ) -> Result<(), StoreError> {
        let key = TypeId::of::<T>();
        if self.stores.contains_key(&key) {
            return Err(StoreError::AlreadyRegistered {
                type_name: type_name::<T>(),
            });
        }

        debug!(
            settings = type_name::<T>(),
            path = %store.path().display(),
            "registered settings store"
        );
        self.stores.insert(key, Box::new(store));
        Ok(())
    }

    pub fn get<T: ObservableModel>(&self) -> Option<&SettingsStore<T>> {
        self.stores
            .get(&TypeId::of::<T>())
            .and_then(|store| store.as_any().downcast_ref::<SettingsStore<T>>())
    }

    /// Live settings handle for `T`, if a store is registered.
    pub fn settings<T: ObservableModel>(&self) -> Option<Settings<T>> {
        self.get::<T>().map(SettingsStore::settings)
    }

    pub fn contains<T: ObservableModel>(&self) -> bool {
        self.stores.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Flush every registered store. Call before shutdown; pending saves are
    /// otherwise lost when the process exits.
    pub async fn flush_all(&self) {
        for store in self.stores.values() {
            debug!(path = %store.path().display(), "flushing settings store");
            store.flush().await;
        }
    }
}

impl fmt::Debug for SettingsRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.stores.values().map(|store| store.path().to_path_buf()))
            .finish()
    }
}
