//! Process-wide content state.
//!
//! The provider is the single writer of the live [`ContentDocument`] and
//! skills list. State is published through `arc-swap`: readers take an
//! immutable snapshot without locking, writers are serialized and publish
//! a fresh snapshot, then notify listeners.
//!
//! # Lifecycle
//!
//! ```text
//! new()      base ⊕ persisted edits          (sync, loading = true)
//! hydrate()  base ⊕ client ⊕ persisted edits (async, loading = false)
//! save/replace/reset/update_skills           (sync, persisted)
//! ```

mod auth;
mod events;

pub use events::{ProviderEvent, ProviderListener, SubscriptionId, ThemeApplier};

use crate::content::{
    BaseContent, ClientId, ContentDocument, LoadedContent, ResourceSource, SkillCategory,
    load_content, merge_document, merge_theme, overlay, skills_from_value,
};
use crate::storage::{Gateway, KeyValueStore, StoreKey};
use crate::theme::{StyleSink, Theme, normalize_theme};
use arc_swap::ArcSwap;
use events::Listeners;
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use std::sync::Arc;

// ============================================================================
// State
// ============================================================================

/// Immutable snapshot of the provider state.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderState {
    pub content: ContentDocument,
    pub skills: Vec<SkillCategory>,
    pub client_id: ClientId,
    /// True until client content has been resolved.
    pub loading: bool,
    pub authed: bool,
    /// Bumped whenever content or skills change.
    pub revision: u64,
}

// ============================================================================
// ContentProvider
// ============================================================================

pub struct ContentProvider<S> {
    base: BaseContent,
    /// Base layers with the active client bundle applied.
    layers: RwLock<LoadedContent>,
    gateway: Gateway<S>,
    state: ArcSwap<ProviderState>,
    /// Serializes writers.
    writer: Mutex<()>,
    listeners: Listeners,
}

impl<S: KeyValueStore> ContentProvider<S> {
    /// Seed state synchronously from the base layers and persisted edits.
    pub fn new(base: BaseContent, gateway: Gateway<S>) -> Self {
        let layers = LoadedContent::from_base(&base);
        let persisted = persisted_content(&gateway);

        let state = ProviderState {
            content: merge_document(&layers.site, &layers.theme, persisted.as_ref()),
            skills: persisted_skills(&gateway).unwrap_or_else(|| base.skill_categories()),
            client_id: ClientId::default(),
            loading: true,
            authed: gateway.load::<bool>(StoreKey::Auth).unwrap_or(false),
            revision: 0,
        };

        Self {
            base,
            layers: RwLock::new(layers),
            gateway,
            state: ArcSwap::from_pointee(state),
            writer: Mutex::new(()),
            listeners: Listeners::default(),
        }
    }

    /// Resolve client content and re-merge persisted edits on top of it.
    ///
    /// Overwrites the current content unconditionally when it completes.
    pub async fn hydrate<R: ResourceSource>(&self, source: &R, client_id: ClientId) {
        let loaded = load_content(&self.base, source, client_id).await;
        let persisted = persisted_content(&self.gateway);

        let content = merge_document(&loaded.site, &loaded.theme, persisted.as_ref());
        let skills = persisted_skills(&self.gateway)
            .unwrap_or_else(|| skills_from_value(&loaded.skills).unwrap_or_default());
        let client_id = loaded.client_id.clone();
        *self.layers.write() = loaded;

        crate::debug!("content"; "resolved content for client {}", client_id);
        self.mutate(|state| {
            state.content = content;
            state.skills = skills;
            state.client_id = client_id;
            state.loading = false;
        });
    }

    // ------------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------------

    /// Current state. Treat as immutable; it is never modified in place.
    pub fn snapshot(&self) -> Arc<ProviderState> {
        self.state.load_full()
    }

    pub fn content(&self) -> ContentDocument {
        self.state.load().content.clone()
    }

    pub fn skills(&self) -> Vec<SkillCategory> {
        self.state.load().skills.clone()
    }

    pub fn theme(&self) -> Theme {
        self.state.load().content.theme.clone()
    }

    pub fn client_id(&self) -> ClientId {
        self.state.load().client_id.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.load().loading
    }

    pub fn revision(&self) -> u64 {
        self.state.load().revision
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Shallow-merge `partial` into the current content and persist.
    ///
    /// `partial.theme` may hold any subset of the palette.
    pub fn save_content(&self, partial: &Map<String, Value>) {
        self.mutate(|state| {
            let mut next = ContentDocument::from_map(&overlay(&state.content.to_map(), partial));
            next.theme = merge_theme(&state.content.theme.to_map(), partial.get("theme"));
            self.gateway.save(StoreKey::Content, &next);
            state.content = next;
        });
    }

    /// Overwrite content: reseed from the base document, then apply `partial`.
    ///
    /// The theme comes from `partial.theme` when given, else the base theme.
    /// Client layers are not applied.
    pub fn replace_content(&self, partial: &Map<String, Value>) {
        self.mutate(|state| {
            let mut next = ContentDocument::from_map(&overlay(&self.base.site, partial));
            next.theme = match partial.get("theme") {
                Some(Value::Null) | None => normalize_theme(&self.base.theme),
                Some(theme) => Theme::from_value(theme),
            };
            self.gateway.save(StoreKey::Content, &next);
            state.content = next;
        });
    }

    /// Drop persisted content and skills, back to the base document.
    pub fn reset_content(&self) {
        self.gateway.remove(StoreKey::Content);
        self.gateway.remove(StoreKey::Skills);

        let layers = self.layers.read().clone();
        self.mutate(|state| {
            state.content = merge_document(&layers.site, &layers.theme, None);
            state.skills = skills_from_value(&layers.skills).unwrap_or_default();
        });
    }

    /// Replace the skills list wholesale and persist.
    pub fn update_skills(&self, skills: Vec<SkillCategory>) {
        self.gateway.save(StoreKey::Skills, &skills);
        self.mutate(|state| state.skills = skills);
    }

    // ------------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------------

    pub fn subscribe(&self, listener: Arc<dyn ProviderListener>) -> SubscriptionId {
        self.listeners.add(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    /// Apply the current theme to `sink` now and on every theme change.
    pub fn attach_styles(&self, sink: Arc<dyn StyleSink>) -> SubscriptionId {
        let applier = ThemeApplier::new(sink);
        applier.apply(&self.theme());
        self.subscribe(Arc::new(applier))
    }

    /// Run one write against a copy of the state, publish it and notify.
    fn mutate(&self, f: impl FnOnce(&mut ProviderState)) {
        let events = {
            let _writer = self.writer.lock();
            let prev = self.state.load_full();
            let mut next = (*prev).clone();
            f(&mut next);

            let events = diff(&prev, &next);
            if next.content != prev.content || next.skills != prev.skills {
                next.revision = prev.revision + 1;
            }
            self.state.store(Arc::new(next));
            events
        };
        self.listeners.emit(&events);
    }
}

fn persisted_content<S: KeyValueStore>(gateway: &Gateway<S>) -> Option<Map<String, Value>> {
    match gateway.load::<Value>(StoreKey::Content)? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn persisted_skills<S: KeyValueStore>(gateway: &Gateway<S>) -> Option<Vec<SkillCategory>> {
    skills_from_value(&gateway.load::<Value>(StoreKey::Skills)?)
}

/// Events describing the transition `prev → next`.
fn diff(prev: &ProviderState, next: &ProviderState) -> Vec<ProviderEvent> {
    let mut events = Vec::new();
    if next.content != prev.content {
        events.push(ProviderEvent::ContentChanged);
    }
    if next.content.theme != prev.content.theme {
        events.push(ProviderEvent::ThemeChanged(next.content.theme.clone()));
    }
    if next.skills != prev.skills {
        events.push(ProviderEvent::SkillsChanged);
    }
    if next.authed != prev.authed {
        events.push(ProviderEvent::AuthChanged(next.authed));
    }
    if prev.loading && !next.loading {
        events.push(ProviderEvent::Loaded(next.client_id.clone()));
    }
    events
}
