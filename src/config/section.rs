//! `[site]` and `[paths]` sections.
//!
//! # Example
//!
//! ```toml
//! [site]
//! client = "studio"            # Client bundle under content/clients/
//!
//! [paths]
//! content = "content"          # Holds clients/<id>/{site,skills,theme}.json
//! storage = ".folio/storage"   # Persisted edits and admin state
//! output = "public"            # Where runtime-theme.css is written
//! ```

use crate::storage::STORAGE_DIR;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Site identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Client identifier. `None` means the default client.
    pub client: Option<String>,
}

/// Filesystem locations. Relative paths are resolved against the
/// directory that contains the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsSectionConfig {
    pub content: PathBuf,
    pub storage: PathBuf,
    pub output: PathBuf,
}

impl Default for PathsSectionConfig {
    fn default() -> Self {
        Self {
            content: "content".into(),
            storage: STORAGE_DIR.into(),
            output: "public".into(),
        }
    }
}
