//! Site configuration management for `folio.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error      # ConfigError
//! ├── section    # [site] and [paths]
//! ├── util       # config discovery, path resolution
//! └── mod.rs     # FolioConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section    | Purpose                                        |
//! |------------|------------------------------------------------|
//! | `[site]`   | Client identifier                              |
//! | `[paths]`  | Content root, storage directory, output dir    |
//!
//! `FOLIO_CLIENT_ID` in the environment overrides `[site] client`.

mod error;
mod section;
mod util;

pub use error::ConfigError;
pub use section::{PathsSectionConfig, SiteSectionConfig};

use crate::{debug, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::{find_config_file, resolve_path};

/// Environment variable overriding the configured client.
pub const CLIENT_ENV: &str = "FOLIO_CLIENT_ID";

/// Default config file name.
pub const CONFIG_FILE: &str = "folio.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolioConfig {
    /// Absolute path to the config file, empty when none was found
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (or cwd)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteSectionConfig,

    #[serde(default)]
    pub paths: PathsSectionConfig,
}

impl FolioConfig {
    /// Load configuration, searching upward from cwd for `config_name`.
    ///
    /// A missing file is not an error: defaults apply, rooted at cwd.
    pub fn load(config_name: &Path) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(config_name, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = path;
                config
            }
            None => {
                debug!("config"; "no {} found, using defaults", config_name.display());
                Self::default()
            }
        };

        let root = config
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(cwd);

        config.apply_env(|key| std::env::var(key).ok());
        config.finalize(&root);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            let display_path = path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_else(|| path.to_string_lossy());
            log!("warning"; "ignoring unknown fields in {}: {}", display_path, ignored.join(", "));
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Apply environment overrides. `lookup` is `std::env::var` outside tests.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(client) = lookup(CLIENT_ENV).filter(|c| !c.is_empty()) {
            self.site.client = Some(client);
        }
    }

    /// Resolve every path against `root`.
    fn finalize(&mut self, root: &Path) {
        self.root = root.to_path_buf();
        self.paths.content = resolve_path(&self.paths.content, root);
        self.paths.storage = resolve_path(&self.paths.storage, root);
        self.paths.output = resolve_path(&self.paths.output, root);
    }

    /// Validate the configured client identifier.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(client) = &self.site.client else {
            return Ok(());
        };
        if client.is_empty() {
            return Err(ConfigError::Validation("[site] client must not be empty".into()));
        }
        if let Some(bad) = client
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(ConfigError::Validation(format!(
                "[site] client `{client}` contains `{bad}`; use letters, digits, `-` or `_`"
            )));
        }
        Ok(())
    }

    pub fn client(&self) -> Option<&str> {
        self.site.client.as_deref()
    }

    pub fn content_dir(&self) -> &Path {
        &self.paths.content
    }

    pub fn storage_dir(&self) -> &Path {
        &self.paths.storage
    }

    pub fn output_dir(&self) -> &Path {
        &self.paths.output
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse config and panic on unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> FolioConfig {
    let (parsed, ignored) = FolioConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(matches!(
            FolioConfig::from_str("[site\nclient = \"x\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_unknown_fields_detected() {
        let (config, ignored) =
            FolioConfig::parse_with_ignored("[site]\nclient = \"a\"\n[deploy]\nforce = true").unwrap();
        assert_eq!(config.client(), Some("a"));
        assert!(ignored.iter().any(|f| f.contains("deploy")));
    }

    #[test]
    fn test_env_overrides_client() {
        let mut config = test_parse_config("[site]\nclient = \"studio\"");
        config.apply_env(|key| (key == CLIENT_ENV).then(|| "acme".to_string()));
        assert_eq!(config.client(), Some("acme"));

        config.apply_env(|_| Some(String::new()));
        assert_eq!(config.client(), Some("acme"));

        config.apply_env(|_| None);
        assert_eq!(config.client(), Some("acme"));
    }

    #[test]
    fn test_validate_client() {
        assert!(test_parse_config("").validate().is_ok());
        assert!(test_parse_config("[site]\nclient = \"a_b-9\"").validate().is_ok());

        for bad in ["", "../etc", "a b", "ü"] {
            let config = test_parse_config(&format!("[site]\nclient = \"{bad}\""));
            assert!(
                matches!(config.validate(), Err(ConfigError::Validation(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_finalize_resolves_against_root() {
        let dir = TempDir::new().unwrap();
        let mut config = test_parse_config("[paths]\noutput = \"dist\"\ncontent = \"/abs/content\"");
        config.finalize(dir.path());

        assert_eq!(config.root, dir.path());
        assert_eq!(config.output_dir(), dir.path().join("dist"));
        assert_eq!(config.storage_dir(), dir.path().join(".folio/storage"));
        assert_eq!(config.content_dir(), Path::new("/abs/content"));
    }

    #[test]
    fn test_from_path_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[site]\nclient = \"studio\"\n").unwrap();
        assert_eq!(FolioConfig::from_path(&path).unwrap().client(), Some("studio"));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(FolioConfig::from_path(&missing), Err(ConfigError::Io(..))));
    }
}
