//! Directory-backed store: one file per key.

use super::{KeyValueStore, StoreError};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Default storage directory name (inside project root)
pub const STORAGE_DIR: &str = ".folio/storage";

/// Keeps each entry in `<dir>/<key>`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::Io(self.dir.clone(), e))?;

        // Write-then-rename: readers never observe a partial entry
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.tmp"));
        fs::write(&tmp, value).map_err(|e| StoreError::Io(tmp.clone(), e))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::Io(path, e))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(StoreError::Io(path, e)),
            _ => Ok(()),
        }
    }
}
