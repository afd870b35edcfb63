//! Atomic TOML file operations.
//!
//! Writes go through a temporary file that is fsynced and renamed over the
//! target, so readers never observe a half-written file. Read-modify-write
//! updates hold an exclusive lock file for their duration.

use serde::{Serialize, de::DeserializeOwned};
use snooze_core::SnoozeError;
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during atomic TOML operations.
#[derive(Debug, Error)]
pub enum AtomicTomlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Lock error: {0}")]
    Lock(String),
    #[error("Invalid path: {}", .0.display())]
    InvalidPath(PathBuf),
}

impl From<AtomicTomlError> for SnoozeError {
    fn from(err: AtomicTomlError) -> Self {
        match err {
            AtomicTomlError::Io(e) => e.into(),
            AtomicTomlError::Parse(e) => e.into(),
            AtomicTomlError::Serialize(e) => e.into(),
            other => SnoozeError::storage(other.to_string()),
        }
    }
}

/// A handle to a TOML file that is only ever replaced atomically.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    /// Restrict the file to its owner (Unix only)
    private: bool,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            private: false,
            _phantom: PhantomData,
        }
    }

    /// Marks the file as holding credentials; it is written with mode 600.
    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicTomlError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(toml::from_str(&content)?))
    }

    /// Serializes `data` and atomically replaces the file.
    pub fn save(&self, data: &T) -> Result<(), AtomicTomlError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml_string = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        self.restrict(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Loads the current contents (or `default_value`), applies `f` and
    /// saves the result while holding the file lock.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<(), AtomicTomlError>
    where
        F: FnOnce(&mut T),
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        f(&mut data);
        self.save(&data)
    }

    /// Replaces the contents with `data` while holding the file lock.
    ///
    /// Unlike [`update`](Self::update) the current contents are not read,
    /// so a corrupt file can still be overwritten.
    pub fn replace(&self, data: &T) -> Result<(), AtomicTomlError> {
        let _lock = FileLock::acquire(&self.path)?;
        self.save(data)
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicTomlError> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| AtomicTomlError::InvalidPath(self.path.clone()))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| AtomicTomlError::InvalidPath(self.path.clone()))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }

    #[cfg(unix)]
    fn restrict(&self, path: &Path) -> Result<(), AtomicTomlError> {
        if self.private {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn restrict(&self, _path: &Path) -> Result<(), AtomicTomlError> {
        Ok(())
    }
}

/// Exclusive lock on `<file>.lock`, released on drop.
///
/// The lock file itself is left in place: deleting it would let a later
/// opener lock a new file while a waiter still holds the old one.
struct FileLock {
    #[allow(dead_code)]
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicTomlError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| AtomicTomlError::Lock(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file })
    }
}
