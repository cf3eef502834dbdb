use std::sync::Arc;

use sv_core::ports::FieldCipherPort;
use sv_core::{EncryptedField, MigrationPolicy, ObservableModel, StoreError};
use tracing::{debug, info, warn};

use super::codec;
use super::field_crypto::decrypt_fields;
use super::file::SettingsFile;
use super::migration::MigrationChain;

/// Where the live instance of a store came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// The primary settings file.
    Primary,
    /// The `.bak` sidecar, after the primary was missing or unreadable.
    Backup,
    /// A fresh default instance.
    Default,
}

pub(crate) struct Loaded<T> {
    pub settings: T,
    pub source: LoadSource,
}

/// Synchronous load pipeline: primary, then backup, then default.
///
/// Runs on the blocking pool. Storage problems are logged and recovered from;
/// only a strict migration policy can fail a load.
pub(crate) struct Loader<T> {
    file: SettingsFile,
    chain: MigrationChain<T>,
    target: u32,
    policy: MigrationPolicy,
    fields: Vec<EncryptedField<T>>,
    cipher: Option<Arc<dyn FieldCipherPort>>,
}

impl<T: ObservableModel> Loader<T> {
    pub fn new(
        file: SettingsFile,
        chain: MigrationChain<T>,
        target: u32,
        policy: MigrationPolicy,
        cipher: Option<Arc<dyn FieldCipherPort>>,
    ) -> Self {
        Self {
            file,
            chain,
            target,
            policy,
            fields: T::encrypted_fields(),
            cipher,
        }
    }

    pub fn run(self) -> Result<Loaded<T>, StoreError> {
        if let Err(e) = self.file.ensure_parent_dir() {
            warn!(
                path = %self.file.path().display(),
                error = %e,
                "failed to create settings directory"
            );
        }

        if let Some(model) = self.read_primary() {
            return Ok(Loaded {
                settings: self.prepare(model)?,
                source: LoadSource::Primary,
            });
        }

        if let Some(model) = self.recover_backup() {
            return Ok(Loaded {
                settings: self.prepare(model)?,
                source: LoadSource::Backup,
            });
        }

        info!(
            path = %self.file.path().display(),
            version = self.target,
            "no usable settings on disk; starting from defaults"
        );
        let mut settings = T::default();
        settings.set_version(Some(self.target));

        Ok(Loaded {
            settings,
            source: LoadSource::Default,
        })
    }

    fn read_primary(&self) -> Option<T> {
        let path = self.file.path();
        let content = match self.file.read_primary() {
            Ok(Some(content)) => content,
            Ok(None) => {
                debug!(path = %path.display(), "settings file not found");
                return None;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read settings file");
                return None;
            }
        };

        match codec::decode::<T>(&content) {
            Ok(Some(model)) => {
                debug!(path = %path.display(), version = ?model.version(), "loaded settings file");
                Some(model)
            }
            Ok(None) => {
                warn!(path = %path.display(), "settings file holds no settings object");
                None
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "settings file is corrupt");
                None
            }
        }
    }

    fn recover_backup(&self) -> Option<T> {
        let path = self.file.backup_path();
        let content = match self.file.read_backup() {
            Ok(Some(content)) => content,
            Ok(None) => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read settings backup");
                return None;
            }
        };

        let model = match codec::decode::<T>(&content) {
            Ok(Some(model)) => model,
            Ok(None) => {
                warn!(path = %path.display(), "settings backup holds no settings object");
                return None;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "settings backup is corrupt");
                return None;
            }
        };

        // A failed repair still leaves a usable instance; the next save rewrites
        // the primary anyway.
        match self.file.restore_backup() {
            Ok(()) => {
                info!(path = %self.file.path().display(), "restored settings file from backup")
            }
            Err(e) => warn!(
                path = %self.file.path().display(),
                error = %e,
                "failed to repair settings file from backup"
            ),
        }

        Some(model)
    }

    fn prepare(&self, model: T) -> Result<T, StoreError> {
        let version = model.schema_version();

        let mut model = if version < self.target {
            let outcome = self.chain.migrate(model, self.target);
            if !outcome.reached_target(self.target) {
                match self.policy {
                    MigrationPolicy::Strict => {
                        return Err(StoreError::IncompleteMigration {
                            reached: outcome.reached,
                            target: self.target,
                        });
                    }
                    MigrationPolicy::Lenient => warn!(
                        from = outcome.from,
                        reached = outcome.reached,
                        target = self.target,
                        "no migration path to the current schema; keeping reached version"
                    ),
                }
            }
            outcome.settings
        } else {
            if version > self.target {
                warn!(
                    version,
                    target = self.target,
                    "settings were written by a newer schema; loading as-is"
                );
            }
            model
        };

        if let Some(cipher) = &self.cipher {
            decrypt_fields(&mut model, &self.fields, cipher.as_ref());
        }

        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::test_support::{Profile, ReversingCipher};
    use sv_core::migration_fn;
    use tempfile::TempDir;

    fn loader(dir: &TempDir, policy: MigrationPolicy) -> Loader<Profile> {
        let mut chain = MigrationChain::new();
        chain
            .register(Box::new(migration_fn(1, 2, |mut p: Profile| {
                if p.name().is_empty() {
                    p.set_name("guest".to_string());
                }
                p
            })))
            .unwrap();

        Loader::new(
            SettingsFile::new(dir.path().join("profile.json")),
            chain,
            2,
            policy,
            Some(Arc::new(ReversingCipher)),
        )
    }

    fn ciphertext(plain: &str) -> String {
        ReversingCipher.encrypt(plain).unwrap()
    }

    #[test]
    fn primary_file_is_migrated_and_decrypted() {
        let dir = TempDir::new().unwrap();
        let doc = format!(
            r#"{{"version":1,"name":"","secret":"{}"}}"#,
            ciphertext("hunter2")
        );
        std::fs::write(dir.path().join("profile.json"), doc).unwrap();

        let loaded = loader(&dir, MigrationPolicy::Lenient).run().unwrap();

        assert_eq!(loaded.source, LoadSource::Primary);
        assert_eq!(loaded.settings.version(), Some(2));
        assert_eq!(loaded.settings.name(), "guest");
        assert_eq!(loaded.settings.secret(), "hunter2");
    }

    #[test]
    fn missing_directory_is_created() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let loader: Loader<Profile> = Loader::new(
            SettingsFile::new(nested.join("profile.json")),
            MigrationChain::new(),
            1,
            MigrationPolicy::Lenient,
            None,
        );

        let loaded = loader.run().unwrap();

        assert!(nested.is_dir());
        assert_eq!(loaded.source, LoadSource::Default);
    }

    #[test]
    fn corrupt_primary_falls_back_to_backup_and_repairs_it() {
        let dir = TempDir::new().unwrap();
        let backup = r#"{"version":2,"name":"ada","secret":""}"#;
        std::fs::write(dir.path().join("profile.json"), "{\"version\":2,\"na").unwrap();
        std::fs::write(dir.path().join("profile.json.bak"), backup).unwrap();

        let loaded = loader(&dir, MigrationPolicy::Lenient).run().unwrap();

        assert_eq!(loaded.source, LoadSource::Backup);
        assert_eq!(loaded.settings.name(), "ada");
        let repaired = std::fs::read_to_string(dir.path().join("profile.json")).unwrap();
        assert_eq!(repaired, backup);
    }

    #[test]
    fn backup_instance_is_migrated_too() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("profile.json.bak"),
            r#"{"name":"","secret":""}"#,
        )
        .unwrap();

        let loaded = loader(&dir, MigrationPolicy::Lenient).run().unwrap();

        assert_eq!(loaded.source, LoadSource::Backup);
        assert_eq!(loaded.settings.version(), Some(2));
        assert_eq!(loaded.settings.name(), "guest");
    }

    #[test]
    fn null_document_counts_as_missing() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("profile.json"), "null").unwrap();

        let loaded = loader(&dir, MigrationPolicy::Lenient).run().unwrap();

        assert_eq!(loaded.source, LoadSource::Default);
    }

    #[test]
    fn corrupt_primary_without_backup_yields_stamped_default() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("profile.json"), [0xff, 0xfe, 0x00]).unwrap();

        let loaded = loader(&dir, MigrationPolicy::Lenient).run().unwrap();

        assert_eq!(loaded.source, LoadSource::Default);
        assert_eq!(loaded.settings.version(), Some(2));
        assert_eq!(loaded.settings.name(), "");
    }

    #[test]
    fn corrupt_backup_yields_default() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("profile.json.bak"), "not json").unwrap();

        let loaded = loader(&dir, MigrationPolicy::Lenient).run().unwrap();

        assert_eq!(loaded.source, LoadSource::Default);
    }

    #[test]
    fn migration_gap_is_lenient_by_default() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("profile.json"),
            r#"{"version":1,"name":"ada"}"#,
        )
        .unwrap();
        let loader: Loader<Profile> = Loader::new(
            SettingsFile::new(dir.path().join("profile.json")),
            MigrationChain::new(),
            3,
            MigrationPolicy::Lenient,
            None,
        );

        let loaded = loader.run().unwrap();

        assert_eq!(loaded.settings.version(), Some(1));
        assert_eq!(loaded.settings.name(), "ada");
    }

    #[test]
    fn strict_policy_rejects_migration_gap() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("profile.json"),
            r#"{"version":1,"name":"ada"}"#,
        )
        .unwrap();
        let loader: Loader<Profile> = Loader::new(
            SettingsFile::new(dir.path().join("profile.json")),
            MigrationChain::new(),
            3,
            MigrationPolicy::Strict,
            None,
        );

        let err = loader.run().err().unwrap();

        assert_eq!(
            err,
            StoreError::IncompleteMigration {
                reached: 1,
                target: 3
            }
        );
    }

    #[test]
    fn newer_schema_is_loaded_unchanged() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("profile.json"),
            r#"{"version":5,"name":""}"#,
        )
        .unwrap();

        let loaded = loader(&dir, MigrationPolicy::Strict).run().unwrap();

        assert_eq!(loaded.settings.version(), Some(5));
        assert_eq!(loaded.settings.name(), "");
    }
}
