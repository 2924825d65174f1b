//! Shared command context: a hydrated provider over the on-disk store.

use crate::config::FolioConfig;
use crate::content::{ClientId, DirSource, base_content, resolve_client_id};
use crate::provider::ContentProvider;
use crate::storage::{FileStore, Gateway};
use anyhow::{Result, bail};

pub struct Session {
    provider: ContentProvider<FileStore>,
}

impl Session {
    /// Seed the provider from the store and resolve client content.
    ///
    /// `client` wins over the configured client; `url` is consulted only
    /// when neither is set.
    pub async fn open(config: &FolioConfig, client: Option<&str>, url: Option<&str>) -> Result<Self> {
        if let Some(raw) = client
            && ClientId::parse(raw).is_none()
        {
            bail!("invalid client `{raw}`; use letters, digits, `-` or `_`");
        }

        let gateway = Gateway::new(FileStore::new(config.storage_dir()));
        let provider = ContentProvider::new(base_content().clone(), gateway);

        let client_id = resolve_client_id(client.or(config.client()), url);
        let source = DirSource::new(config.content_dir());
        provider.hydrate(&source, client_id).await;

        Ok(Self { provider })
    }

    pub fn provider(&self) -> &ContentProvider<FileStore> {
        &self.provider
    }

    /// Fail unless a previous `login` is still in effect.
    pub fn require_auth(&self) -> Result<()> {
        if !self.provider.is_authed() {
            bail!("not logged in; run `folio login <password>` first");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> FolioConfig {
        let mut config = FolioConfig::default();
        config.paths.content = dir.path().join("content");
        config.paths.storage = dir.path().join("storage");
        config.paths.output = dir.path().join("public");
        config
    }

    #[tokio::test]
    async fn test_open_resolves_client_bundle() {
        let dir = TempDir::new().unwrap();
        let client_dir = dir.path().join("content/clients/acme");
        fs::create_dir_all(&client_dir).unwrap();
        fs::write(client_dir.join("site.json"), r#"{ "name": "Acme Person" }"#).unwrap();

        let session = Session::open(&config(&dir), None, Some("/?client=acme")).await.unwrap();
        let state = session.provider().snapshot();
        assert!(!state.loading);
        assert_eq!(state.client_id.as_str(), "acme");
        assert_eq!(state.content.name, "Acme Person");
    }

    #[tokio::test]
    async fn test_open_rejects_bad_client() {
        let dir = TempDir::new().unwrap();
        assert!(Session::open(&config(&dir), Some("../x"), None).await.is_err());
    }

    #[tokio::test]
    async fn test_require_auth() {
        let dir = TempDir::new().unwrap();
        let session = Session::open(&config(&dir), None, None).await.unwrap();
        assert!(session.require_auth().is_err());

        assert!(session.provider().login("pw"));
        assert!(session.require_auth().is_ok());
    }
}
