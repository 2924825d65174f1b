//! Client-specific content resolution.
//!
//! A client identifier selects an optional override bundle
//! (`clients/<id>/{site,skills,theme}.json`). Each resource is optional:
//! a missing or malformed file keeps the base value for exactly that
//! resource and never aborts the load.

use super::bundle::BaseContent;
use super::merge::overlay;
use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Identifier meaning "no override bundle".
pub const DEFAULT_CLIENT: &str = "default";

/// Query parameter selecting a client.
pub const CLIENT_QUERY_PARAM: &str = "client";

// ============================================================================
// ClientId
// ============================================================================

/// Validated client identifier (`[A-Za-z0-9_-]+`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Parse a raw identifier. Empty input or characters that could
    /// escape the client directory are rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| Self(raw.to_string()))
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_CLIENT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self(DEFAULT_CLIENT.to_string())
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pick the active client.
///
/// Priority: configured value → `client` query parameter of `url` →
/// `default`. `url` may be absolute or just a query (`?client=acme`).
pub fn resolve_client_id(configured: Option<&str>, url: Option<&str>) -> ClientId {
    if let Some(id) = configured.and_then(ClientId::parse) {
        return id;
    }

    url.and_then(client_from_url).unwrap_or_default()
}

fn client_from_url(raw: &str) -> Option<ClientId> {
    let url = Url::parse("http://localhost/").ok()?.join(raw).ok()?;
    let (_, value) = url
        .query_pairs()
        .find(|(key, value)| key == CLIENT_QUERY_PARAM && !value.is_empty())?;
    ClientId::parse(&value)
}

// ============================================================================
// Resources
// ============================================================================

/// The three optional per-client resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Site,
    Skills,
    Theme,
}

impl Resource {
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Site => "site.json",
            Self::Skills => "skills.json",
            Self::Theme => "theme.json",
        }
    }
}

/// Keyed lookup of optional client resources. Absence is not an error.
pub trait ResourceSource: Send + Sync {
    fn try_load(
        &self,
        client: &ClientId,
        resource: Resource,
    ) -> impl Future<Output = Option<Value>> + Send;
}

#[derive(Debug, Error)]
enum ResourceError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed JSON in `{0}`: {1}")]
    Parse(PathBuf, #[source] serde_json::Error),
}

/// Reads `<root>/clients/<id>/<resource>.json`.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, client: &ClientId, resource: Resource) -> PathBuf {
        self.root
            .join("clients")
            .join(client.as_str())
            .join(resource.file_name())
    }
}

async fn read_resource(path: &Path) -> Result<Value, ResourceError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ResourceError::Io(path.to_path_buf(), e))?;
    serde_json::from_str(&text).map_err(|e| ResourceError::Parse(path.to_path_buf(), e))
}

impl ResourceSource for DirSource {
    async fn try_load(&self, client: &ClientId, resource: Resource) -> Option<Value> {
        let path = self.path_for(client, resource);
        match read_resource(&path).await {
            Ok(value) => Some(value),
            Err(ResourceError::Io(_, e)) if e.kind() == std::io::ErrorKind::NotFound => {
                crate::debug!("content"; "no client {} found for {}, using base", resource.file_name(), client);
                None
            }
            Err(e) => {
                crate::debug!("content"; "{}, using base", e);
                None
            }
        }
    }
}

/// In-memory resource table.
#[derive(Debug, Default)]
pub struct MemorySource {
    entries: FxHashMap<(String, Resource), Value>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, client: &str, resource: Resource, value: Value) -> Self {
        self.entries.insert((client.to_string(), resource), value);
        self
    }
}

impl ResourceSource for MemorySource {
    async fn try_load(&self, client: &ClientId, resource: Resource) -> Option<Value> {
        self.entries
            .get(&(client.as_str().to_string(), resource))
            .cloned()
    }
}

// ============================================================================
// load_content
// ============================================================================

/// Base layers with the client overrides applied.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedContent {
    pub site: Map<String, Value>,
    pub skills: Value,
    pub theme: Map<String, Value>,
    pub client_id: ClientId,
}

impl LoadedContent {
    /// The base layers alone, under the default client.
    pub fn from_base(base: &BaseContent) -> Self {
        Self {
            site: base.site.clone(),
            skills: base.skills.clone(),
            theme: base.theme.clone(),
            client_id: ClientId::default(),
        }
    }
}

/// Merge the client bundle (if any) over the base layers.
///
/// - site: base ⊕ client site
/// - skills: client skills when they are an array, else base
/// - theme: base theme ⊕ client theme
pub async fn load_content<S: ResourceSource>(
    base: &BaseContent,
    source: &S,
    client_id: ClientId,
) -> LoadedContent {
    let mut loaded = LoadedContent::from_base(base);
    if client_id.is_default() {
        return loaded;
    }

    let (site, skills, theme) = tokio::join!(
        source.try_load(&client_id, Resource::Site),
        source.try_load(&client_id, Resource::Skills),
        source.try_load(&client_id, Resource::Theme),
    );

    match site {
        Some(Value::Object(client_site)) => loaded.site = overlay(&base.site, &client_site),
        Some(_) => crate::debug!("content"; "client {} site is not an object, using base", client_id),
        None => {}
    }

    match skills {
        Some(client_skills @ Value::Array(_)) => loaded.skills = client_skills,
        Some(_) => crate::debug!("content"; "client {} skills are not an array, using base", client_id),
        None => {}
    }

    match theme {
        Some(Value::Object(client_theme)) => loaded.theme = overlay(&base.theme, &client_theme),
        Some(_) => crate::debug!("content"; "client {} theme is not an object, using base", client_id),
        None => {}
    }

    loaded.client_id = client_id;
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn base() -> BaseContent {
        BaseContent::new(
            json!({ "name": "A", "title": "T" }).as_object().cloned().unwrap(),
            json!([{ "id": "base" }]),
            json!({ "primary": "#000000", "white": "#FFFFFF" }).as_object().cloned().unwrap(),
        )
    }

    fn client(id: &str) -> ClientId {
        ClientId::parse(id).unwrap()
    }

    #[test]
    fn test_client_id_parse() {
        assert_eq!(client("acme-2").as_str(), "acme-2");
        assert!(ClientId::parse("").is_none());
        assert!(ClientId::parse("../etc").is_none());
        assert!(ClientId::parse("a/b").is_none());
        assert!(ClientId::default().is_default());
    }

    #[test]
    fn test_resolve_client_priority() {
        assert_eq!(resolve_client_id(Some("cfg"), Some("?client=url")).as_str(), "cfg");
        assert_eq!(resolve_client_id(None, Some("https://me.dev/?client=url")).as_str(), "url");
        assert_eq!(resolve_client_id(Some(""), Some("?client=url")).as_str(), "url");
        assert_eq!(resolve_client_id(None, Some("?other=1")).as_str(), DEFAULT_CLIENT);
        assert_eq!(resolve_client_id(None, Some("?client=")).as_str(), DEFAULT_CLIENT);
        assert!(resolve_client_id(None, None).is_default());
    }

    #[tokio::test]
    async fn test_default_client_skips_lookup() {
        let source = MemorySource::new().with(DEFAULT_CLIENT, Resource::Site, json!({ "name": "X" }));
        let loaded = load_content(&base(), &source, ClientId::default()).await;
        assert_eq!(loaded, LoadedContent::from_base(&base()));
    }

    #[tokio::test]
    async fn test_client_overrides_each_resource() {
        let source = MemorySource::new()
            .with("acme", Resource::Site, json!({ "name": "B" }))
            .with("acme", Resource::Skills, json!([{ "id": "client" }]))
            .with("acme", Resource::Theme, json!({ "primary": "#333" }));

        let loaded = load_content(&base(), &source, client("acme")).await;
        assert_eq!(loaded.site["name"], json!("B"));
        assert_eq!(loaded.site["title"], json!("T"));
        assert_eq!(loaded.skills, json!([{ "id": "client" }]));
        assert_eq!(loaded.theme["primary"], json!("#333"));
        assert_eq!(loaded.theme["white"], json!("#FFFFFF"));
        assert_eq!(loaded.client_id.as_str(), "acme");
    }

    #[tokio::test]
    async fn test_malformed_resource_degrades_per_resource() {
        let source = MemorySource::new()
            .with("acme", Resource::Site, json!(["not", "an", "object"]))
            .with("acme", Resource::Skills, json!({ "nope": true }))
            .with("acme", Resource::Theme, json!({ "primary": "#444444" }));

        let loaded = load_content(&base(), &source, client("acme")).await;
        assert_eq!(loaded.site, base().site);
        assert_eq!(loaded.skills, base().skills);
        assert_eq!(loaded.theme["primary"], json!("#444444"));
    }

    #[tokio::test]
    async fn test_dir_source_reads_and_tolerates_missing() {
        let temp = TempDir::new().unwrap();
        let source = DirSource::new(temp.path());
        let acme = client("acme");

        let site_path = source.path_for(&acme, Resource::Site);
        std::fs::create_dir_all(site_path.parent().unwrap()).unwrap();
        std::fs::write(&site_path, r#"{ "name": "Acme" }"#).unwrap();
        std::fs::write(source.path_for(&acme, Resource::Theme), "{ broken").unwrap();

        assert_eq!(source.try_load(&acme, Resource::Site).await, Some(json!({ "name": "Acme" })));
        assert_eq!(source.try_load(&acme, Resource::Skills).await, None);
        assert_eq!(source.try_load(&acme, Resource::Theme).await, None);

        let loaded = load_content(&base(), &source, acme).await;
        assert_eq!(loaded.site["name"], json!("Acme"));
        assert_eq!(loaded.theme, base().theme);
    }
}
