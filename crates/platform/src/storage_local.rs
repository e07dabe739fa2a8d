//! Local filesystem key-value store for the desktop emulator.
//!
//! `FileStore` implements `platform::KeyValueStore` on top of a single
//! postcard-encoded file. Every successful write rewrites the whole file,
//! so the store survives emulator restarts.
//! Used when the `std` feature is enabled (emulator builds only).

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::storage::{KeyValueStore, StorageError};

/// Most keys a store will hold.
pub const MAX_KEYS: usize = 256;

/// Environment variable naming the store file.
pub const STATE_PATH_ENV: &str = "SILLY_WALK_STATE";

/// Store file used when [`STATE_PATH_ENV`] is unset.
pub const DEFAULT_STATE_PATH: &str = "silly-walk-state.bin";

/// Error type for opening a store file.
#[derive(Debug, Error)]
pub enum FileStoreError {
    /// The file exists but could not be read.
    #[error("cannot read store file: {0}")]
    Io(#[from] std::io::Error),
    /// The file contents are not a postcard-encoded key map.
    #[error("store file is corrupt: {0}")]
    Decode(#[from] postcard::Error),
}

/// A `platform::KeyValueStore` backed by one file on disk.
///
/// # Example
/// ```no_run
/// use platform::storage_local::FileStore;
/// use platform::KeyValueStore;
/// let mut store = FileStore::open("/tmp/silly-walk-state.bin").unwrap();
/// store.write_bool(2, true).unwrap();
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<u32, bool>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FileStoreError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read(&path) {
            Ok(bytes) => postcard::from_bytes(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    /// Open the file named by `SILLY_WALK_STATE`, or the default path.
    pub fn from_env() -> Result<Self, FileStoreError> {
        let path = std::env::var(STATE_PATH_ENV).unwrap_or_else(|_| DEFAULT_STATE_PATH.into());
        Self::open(path)
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn flush(&self) -> Result<(), StorageError> {
        let bytes = postcard::to_stdvec(&self.values).map_err(|_| StorageError::Corrupt)?;
        fs::write(&self.path, bytes).map_err(|_| StorageError::WriteFailed)
    }
}

impl KeyValueStore for FileStore {
    fn exists(&self, key: u32) -> bool {
        self.values.contains_key(&key)
    }

    fn read_bool(&self, key: u32) -> Option<bool> {
        self.values.get(&key).copied()
    }

    fn write_bool(&mut self, key: u32, value: bool) -> Result<(), StorageError> {
        if !self.values.contains_key(&key) && self.values.len() >= MAX_KEYS {
            return Err(StorageError::Full(key));
        }
        let previous = self.values.insert(key, value);
        if let Err(e) = self.flush() {
            // Keep memory and disk in agreement.
            match previous {
                Some(old) => self.values.insert(key, old),
                None => self.values.remove(&key),
            };
            return Err(e);
        }
        Ok(())
    }
}
