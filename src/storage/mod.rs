//! Persistence gateway over a string key/value store.
//!
//! The gateway is best-effort: reads of missing or corrupt entries are
//! `None`, and failed writes are dropped. Nothing here returns an error
//! to the caller, so in-memory state stays authoritative for the session
//! even when the store is full or unavailable.
//!
//! Several handles on the same store see each other's writes with
//! last-write-wins semantics; there is no locking or conflict detection.

mod file;
mod memory;

pub use file::{FileStore, STORAGE_DIR};
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// Keys
// ============================================================================

/// Entries the site keeps in persistent storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// Full content document, without skills.
    Content,
    /// Array of skill categories.
    Skills,
    /// Boolean "is authenticated" flag.
    Auth,
    /// Plaintext admin passphrase.
    Passphrase,
}

impl StoreKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Content => "site.content",
            Self::Skills => "site.skills",
            Self::Auth => "site.admin.auth",
            Self::Passphrase => "site.admin.pass",
        }
    }
}

// ============================================================================
// Store trait
// ============================================================================

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error when accessing `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Raw string key/value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

// ============================================================================
// Gateway
// ============================================================================

/// JSON-typed, never-failing access to a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct Gateway<S> {
    store: S,
}

impl<S: KeyValueStore> Gateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Serialize `value` as JSON under `key`. Failures are dropped.
    pub fn save<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.save_raw(key, &json),
            Err(e) => crate::debug!("storage"; "failed to serialize {}: {}", key.as_str(), e),
        }
    }

    /// Read and decode `key`. Missing, unreadable or corrupt data is `None`.
    pub fn load<T: DeserializeOwned>(&self, key: StoreKey) -> Option<T> {
        let raw = self.load_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                crate::debug!("storage"; "ignoring corrupt {}: {}", key.as_str(), e);
                None
            }
        }
    }

    /// Store a plain string (no JSON encoding).
    pub fn save_raw(&self, key: StoreKey, value: &str) {
        if let Err(e) = self.store.set(key.as_str(), value) {
            crate::debug!("storage"; "failed to write {}: {}", key.as_str(), e);
        }
    }

    /// Read a plain string. Empty values count as absent.
    pub fn load_raw(&self, key: StoreKey) -> Option<String> {
        match self.store.get(key.as_str()) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                crate::debug!("storage"; "failed to read {}: {}", key.as_str(), e);
                None
            }
        }
    }

    pub fn remove(&self, key: StoreKey) {
        if let Err(e) = self.store.remove(key.as_str()) {
            crate::debug!("storage"; "failed to remove {}: {}", key.as_str(), e);
        }
    }
}
