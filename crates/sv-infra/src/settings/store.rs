use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use sv_core::ports::{FieldCipherPort, WriteDispatcherPort};
use sv_core::settings::DEFAULT_SAVE_DEBOUNCE;
use sv_core::{
    EncryptedField, FieldChange, MigrationPolicy, MigrationStep, ObservableModel, Settings,
    StoreError,
};
use tokio::runtime::Handle;
use tokio::sync::{oneshot, Mutex as AsyncMutex, OwnedMutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::codec;
use super::dispatch::BlockingPoolDispatcher;
use super::error::SettingsFileError;
use super::field_crypto::{decrypt_fields, encrypt_fields};
use super::file::SettingsFile;
use super::loader::{LoadSource, Loader};
use super::migration::MigrationChain;

/// File-backed store for one settings type.
///
/// Cloning is cheap; every clone drives the same live instance and the same
/// save machinery.
pub struct SettingsStore<T: ObservableModel> {
    inner: Arc<StoreInner<T>>,
}

/// Configures and loads a [`SettingsStore`].
pub struct SettingsStoreBuilder<T: ObservableModel> {
    path: PathBuf,
    current_version: u32,
    migrations: Vec<Box<dyn MigrationStep<T>>>,
    cipher: Option<Arc<dyn FieldCipherPort>>,
    dispatcher: Option<Arc<dyn WriteDispatcherPort>>,
    debounce: Duration,
    policy: MigrationPolicy,
}

struct PendingSave {
    id: u64,
    token: CancellationToken,
}

struct StoreInner<T: ObservableModel> {
    file: SettingsFile,
    current_version: u32,
    settings: Settings<T>,
    encrypted_fields: Vec<EncryptedField<T>>,
    cipher: Option<Arc<dyn FieldCipherPort>>,
    dispatcher: Arc<dyn WriteDispatcherPort>,
    runtime: Handle,
    debounce: Duration,
    load_source: LoadSource,
    /// Single-writer gate. Held from the snapshot until the write job finishes,
    /// independently of whoever awaits the save.
    save_gate: Arc<AsyncMutex<()>>,
    pending: Mutex<Option<PendingSave>>,
    next_save_id: AtomicU64,
    /// Set while the save path rewrites fields in memory.
    saving: AtomicBool,
}

/// Raises the in-progress-save flag for its lifetime.
struct SavingGuard<'a>(&'a AtomicBool);

impl<'a> SavingGuard<'a> {
    fn engage(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<T: ObservableModel> SettingsStore<T> {
    pub fn builder(path: impl Into<PathBuf>, current_version: u32) -> SettingsStoreBuilder<T> {
        SettingsStoreBuilder {
            path: path.into(),
            current_version,
            migrations: Vec::new(),
            cipher: None,
            dispatcher: None,
            debounce: DEFAULT_SAVE_DEBOUNCE,
            policy: MigrationPolicy::default(),
        }
    }

    /// Stable handle to the live instance. Every call returns the same instance.
    pub fn settings(&self) -> Settings<T> {
        self.inner.settings.clone()
    }

    pub fn path(&self) -> &Path {
        self.inner.file.path()
    }

    pub fn backup_path(&self) -> &Path {
        self.inner.file.backup_path()
    }

    pub fn current_version(&self) -> u32 {
        self.inner.current_version
    }

    pub fn load_source(&self) -> LoadSource {
        self.inner.load_source
    }

    /// Whether a debounced save is scheduled and has not started yet.
    pub fn has_pending_save(&self) -> bool {
        self.inner.pending_slot().is_some()
    }

    /// Run a pending debounced save now instead of waiting out the quiet period.
    ///
    /// Also waits for a save that is already executing. Does nothing else when
    /// no save is pending.
    pub async fn flush(&self) {
        let pending = self.inner.take_pending();
        if let Some(pending) = &pending {
            pending.token.cancel();
        }

        let gate = self.inner.acquire_gate().await;
        if pending.is_some() {
            debug!(path = %self.path().display(), "flushing pending settings save");
            self.inner.save_locked(gate).await;
        }
    }

    /// Save the current state immediately through the single-writer gate.
    ///
    /// Supersedes any pending debounced save. Failures are logged, not returned.
    pub async fn save_now(&self) {
        if let Some(pending) = self.inner.take_pending() {
            pending.token.cancel();
        }

        let gate = self.inner.acquire_gate().await;
        self.inner.save_locked(gate).await;
    }
}

impl<T: ObservableModel> Clone for SettingsStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ObservableModel> fmt::Debug for SettingsStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsStore")
            .field("path", &self.inner.file.path())
            .field("current_version", &self.inner.current_version)
            .field("load_source", &self.inner.load_source)
            .field("debounce", &self.inner.debounce)
            .finish_non_exhaustive()
    }
}

impl<T: ObservableModel> SettingsStoreBuilder<T> {
    /// Register a schema migration step.
    pub fn migration<M>(mut self, step: M) -> Self
    where
        M: MigrationStep<T> + 'static,
    {
        self.migrations.push(Box::new(step));
        self
    }

    /// Field cipher for the type's encrypted fields. Required when the type
    /// declares any.
    pub fn cipher(mut self, cipher: Arc<dyn FieldCipherPort>) -> Self {
        self.cipher = Some(cipher);
        self
    }

    /// Quiet period between the last change and the write.
    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Execution context for file writes. Defaults to the tokio blocking pool.
    pub fn dispatcher(mut self, dispatcher: Arc<dyn WriteDispatcherPort>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn migration_policy(mut self, policy: MigrationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Load the settings and start watching them.
    ///
    /// Must be called within a tokio runtime; saves are scheduled on it. When
    /// nothing usable is on disk, the default instance is written before this
    /// returns.
    ///
    /// # Errors
    ///
    /// Fails on a duplicate or non-advancing migration, on encrypted fields
    /// without a cipher, and on a migration gap under
    /// [`MigrationPolicy::Strict`]. Unreadable files are never an error: the
    /// store falls back to the backup, then to the default instance.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde::{Deserialize, Serialize};
    /// use sv_core::{migration_fn, ChangeNotifier, ObservableModel};
    /// use sv_infra::{LoadSource, SettingsStore};
    ///
    /// #[derive(Default, Serialize, Deserialize)]
    /// struct Ui {
    ///     #[serde(default)]
    ///     version: Option<u32>,
    ///     #[serde(default)]
    ///     zoom: u32,
    ///     #[serde(skip)]
    ///     notifier: ChangeNotifier,
    /// }
    ///
    /// impl ObservableModel for Ui {
    ///     fn notifier(&self) -> &ChangeNotifier {
    ///         &self.notifier
    ///     }
    ///
    ///     fn notifier_mut(&mut self) -> &mut ChangeNotifier {
    ///         &mut self.notifier
    ///     }
    ///
    ///     fn version(&self) -> Option<u32> {
    ///         self.version
    ///     }
    ///
    ///     fn set_version(&mut self, version: Option<u32>) -> bool {
    ///         self.notifier.set_field(&mut self.version, version, "version")
    ///     }
    /// }
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let dir = tempfile::TempDir::new().unwrap();
    /// let store = SettingsStore::<Ui>::builder(dir.path().join("ui.json"), 2)
    ///     .migration(migration_fn(1, 2, |mut ui: Ui| {
    ///         ui.zoom = ui.zoom.max(100);
    ///         ui
    ///     }))
    ///     .build()
    ///     .await
    ///     .unwrap();
    ///
    /// assert_eq!(store.load_source(), LoadSource::Default);
    /// assert!(store.path().exists());
    /// # }
    /// ```
    pub async fn build(self) -> Result<SettingsStore<T>, StoreError> {
        let mut chain = MigrationChain::new();
        for step in self.migrations {
            chain.register(step)?;
        }

        let encrypted_fields = T::encrypted_fields();
        if !encrypted_fields.is_empty() && self.cipher.is_none() {
            return Err(StoreError::CipherRequired);
        }

        let runtime = Handle::current();
        let file = SettingsFile::new(self.path);
        let loader = Loader::new(
            file.clone(),
            chain,
            self.current_version,
            self.policy,
            self.cipher.clone(),
        );
        let loaded = tokio::task::spawn_blocking(move || loader.run())
            .await
            .map_err(|e| StoreError::LoadTask(e.to_string()))??;

        let dispatcher = self
            .dispatcher
            .unwrap_or_else(|| Arc::new(BlockingPoolDispatcher::new(runtime.clone())));

        let inner = Arc::new(StoreInner {
            file,
            current_version: self.current_version,
            settings: Settings::new(loaded.settings),
            encrypted_fields,
            cipher: self.cipher,
            dispatcher,
            runtime,
            debounce: self.debounce,
            load_source: loaded.source,
            save_gate: Arc::new(AsyncMutex::new(())),
            pending: Mutex::new(None),
            next_save_id: AtomicU64::new(0),
            saving: AtomicBool::new(false),
        });
        StoreInner::attach(&inner);

        let store = SettingsStore { inner };
        debug!(
            path = %store.path().display(),
            source = ?loaded.source,
            version = store.current_version(),
            "settings store ready"
        );

        if loaded.source == LoadSource::Default {
            store.save_now().await;
        }

        Ok(store)
    }
}

impl<T: ObservableModel> StoreInner<T> {
    /// Route the model's change notifications to the save scheduler.
    ///
    /// The listener holds a weak reference: the model must not keep its own
    /// store alive.
    fn attach(inner: &Arc<Self>) {
        let weak = Arc::downgrade(inner);
        inner.settings.update(|model| {
            model.notifier_mut().subscribe(move |change| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_change(change);
                }
            });
        });
    }

    fn on_change(self: &Arc<Self>, change: FieldChange) {
        if self.saving.load(Ordering::SeqCst) {
            trace!(field = change.field, "change raised by save; not rescheduling");
            return;
        }
        self.schedule_save();
    }

    fn schedule_save(self: &Arc<Self>) {
        let id = self.next_save_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();

        let previous = self.pending_slot().replace(PendingSave {
            id,
            token: token.clone(),
        });
        if let Some(previous) = previous {
            trace!(superseded = previous.id, id, "restarting save debounce");
            previous.token.cancel();
        }

        let inner = Arc::clone(self);
        self.runtime.spawn(inner.debounced_save(id, token));
    }

    async fn debounced_save(self: Arc<Self>, id: u64, token: CancellationToken) {
        tokio::select! {
            biased;
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(self.debounce) => {}
        }

        let gate = tokio::select! {
            biased;
            _ = token.cancelled() => return,
            gate = self.acquire_gate() => gate,
        };
        if token.is_cancelled() {
            return;
        }

        self.clear_pending(id);
        self.save_locked(gate).await;
    }

    async fn acquire_gate(&self) -> OwnedMutexGuard<()> {
        Arc::clone(&self.save_gate).lock_owned().await
    }

    /// One complete save under the single-writer gate.
    async fn save_locked(&self, gate: OwnedMutexGuard<()>) {
        let path = self.file.path();
        match self.persist(gate).await {
            Ok(()) => {
                debug!(path = %path.display(), version = self.current_version, "settings saved")
            }
            Err(e) => warn!(path = %path.display(), error = %e, "failed to save settings"),
        }
    }

    async fn persist(&self, gate: OwnedMutexGuard<()>) -> Result<(), SettingsFileError> {
        let content = self.snapshot()?;
        let file = self.file.clone();
        let (tx, rx) = oneshot::channel();

        // The gate moves into the job: dropping the awaiting future must not let
        // another save start while this write is still running.
        self.dispatcher.dispatch(Box::new(move || {
            let result = write_with_backup(&file, &content);
            drop(gate);
            let _ = tx.send(result);
        }));

        rx.await.map_err(|_| SettingsFileError::Dispatch)?
    }

    /// Serialize the live instance in its at-rest form.
    ///
    /// Encrypted fields are restored to plaintext before the model lock is
    /// released, so readers never see ciphertext.
    fn snapshot(&self) -> Result<String, SettingsFileError> {
        let mut model = self.settings.lock();
        let _saving = SavingGuard::engage(&self.saving);

        if let Some(cipher) = &self.cipher {
            encrypt_fields(&mut *model, &self.encrypted_fields, cipher.as_ref());
        }
        model.set_version(Some(self.current_version));

        let encoded = codec::encode(&*model);

        if let Some(cipher) = &self.cipher {
            decrypt_fields(&mut *model, &self.encrypted_fields, cipher.as_ref());
        }

        Ok(encoded?)
    }

    fn pending_slot(&self) -> MutexGuard<'_, Option<PendingSave>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take_pending(&self) -> Option<PendingSave> {
        self.pending_slot().take()
    }

    fn clear_pending(&self, id: u64) {
        let mut slot = self.pending_slot();
        if slot.as_ref().is_some_and(|pending| pending.id == id) {
            *slot = None;
        }
    }
}

/// Back up the current primary, then atomically replace it.
fn write_with_backup(file: &SettingsFile, content: &str) -> Result<(), SettingsFileError> {
    if let Err(e) = file.backup() {
        warn!(
            path = %file.backup_path().display(),
            error = %e,
            "failed to back up settings file; saving anyway"
        );
    }

    file.replace(content).map_err(SettingsFileError::Write)
}
