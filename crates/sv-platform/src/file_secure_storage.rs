use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sv_core::ports::{SecureStorageError, SecureStoragePort};

/// File-based secure storage for headless environments without a keychain.
///
/// One file per key, owner read/write only on Unix.
#[derive(Debug, Clone)]
pub struct FileSecureStorage {
    base_dir: PathBuf,
}

impl FileSecureStorage {
    /// Storage rooted at `<app_data_root>/keys`, created if missing.
    pub fn new_in_app_data_root(app_data_root: &Path) -> Result<Self, io::Error> {
        let base_dir = app_data_root.join("keys");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    // Key names contain ':' which Windows does not allow in file names.
    fn file_path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
            .collect();
        self.base_dir.join(format!("{file_name}.key"))
    }

    fn map_io_error(context: &str, err: io::Error) -> SecureStorageError {
        match err.kind() {
            io::ErrorKind::PermissionDenied => {
                SecureStorageError::PermissionDenied(format!("{context}: {err}"))
            }
            _ => SecureStorageError::Other(format!("{context}: {err}")),
        }
    }
}

impl SecureStoragePort for FileSecureStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, SecureStorageError> {
        match fs::read(self.file_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::map_io_error("failed to read key file", err)),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), SecureStorageError> {
        fs::create_dir_all(&self.base_dir)
            .map_err(|err| Self::map_io_error("failed to create key directory", err))?;

        let path = self.file_path(key);
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, value)
            .map_err(|err| Self::map_io_error("failed to write key temp file", err))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o600))
                .map_err(|err| Self::map_io_error("failed to restrict key file permissions", err))?;
        }

        fs::rename(&temp_path, &path)
            .map_err(|err| Self::map_io_error("failed to replace key file", err))
    }

    fn delete(&self, key: &str) -> Result<(), SecureStorageError> {
        match fs::remove_file(self.file_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Self::map_io_error("failed to delete key file", err)),
        }
    }
}
