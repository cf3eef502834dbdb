use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use sv_core::settings::{BACKUP_SUFFIX, TEMP_SUFFIX};

/// On-disk layout of one store: the primary file, its single-generation `.bak`
/// sidecar, and the transient `.tmp` write target.
///
/// All operations are blocking; the engine runs them off the async executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsFile {
    path: PathBuf,
    backup_path: PathBuf,
    temp_path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            backup_path: sidecar(&path, BACKUP_SUFFIX),
            temp_path: sidecar(&path, TEMP_SUFFIX),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Create the containing directory if it does not exist yet.
    pub fn ensure_parent_dir(&self) -> io::Result<()> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
            _ => Ok(()),
        }
    }

    /// Read the primary file; `None` when it does not exist.
    pub fn read_primary(&self) -> io::Result<Option<String>> {
        read_optional(&self.path)
    }

    /// Read the backup file; `None` when it does not exist.
    pub fn read_backup(&self) -> io::Result<Option<String>> {
        read_optional(&self.backup_path)
    }

    /// Snapshot the primary file into the backup slot, replacing any previous
    /// backup. Returns `false` when there was no primary file to back up.
    pub fn backup(&self) -> io::Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }

        match fs::remove_file(&self.backup_path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err),
        }

        fs::copy(&self.path, &self.backup_path)?;
        Ok(true)
    }

    /// Repair the primary file from the backup.
    pub fn restore_backup(&self) -> io::Result<()> {
        fs::copy(&self.backup_path, &self.temp_path)?;
        self.commit_temp()
    }

    /// Replace the primary file with `content` without ever exposing a partially
    /// written primary: write the temp sibling, flush it, then rename it over.
    ///
    /// # Returns
    ///
    /// `Ok(())` once the rename has landed. On failure the primary is untouched
    /// and the temp file is removed on a best-effort basis.
    ///
    /// # Examples
    ///
    /// ```
    /// use sv_infra::SettingsFile;
    ///
    /// let dir = tempfile::TempDir::new().unwrap();
    /// let file = SettingsFile::new(dir.path().join("nested/app.json"));
    ///
    /// file.replace("{\"theme\": \"Dark\"}").unwrap();
    ///
    /// assert_eq!(file.read_primary().unwrap().as_deref(), Some("{\"theme\": \"Dark\"}"));
    /// assert!(!file.temp_path().exists());
    /// ```
    pub fn replace(&self, content: &str) -> io::Result<()> {
        self.ensure_parent_dir()?;

        let mut tmp = File::create(&self.temp_path)?;
        tmp.write_all(content.as_bytes())?;
        tmp.sync_all()?;
        drop(tmp);

        self.commit_temp()
    }

    fn commit_temp(&self) -> io::Result<()> {
        if let Err(err) = fs::rename(&self.temp_path, &self.path) {
            let _ = fs::remove_file(&self.temp_path);
            return Err(err);
        }
        Ok(())
    }
}

fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

fn read_optional(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}
