//! Change notifications emitted by the content provider.

use crate::content::ClientId;
use crate::theme::{StyleSink, Theme, apply_theme};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// What changed in the provider state.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderEvent {
    ContentChanged,
    SkillsChanged,
    /// Carries the new, normalized theme.
    ThemeChanged(Theme),
    AuthChanged(bool),
    /// Client content resolved; `loading` is now false.
    Loaded(ClientId),
}

/// Receives provider events synchronously, after the state is published.
pub trait ProviderListener: Send + Sync {
    fn on_event(&self, event: &ProviderEvent);
}

impl<F> ProviderListener for F
where
    F: Fn(&ProviderEvent) + Send + Sync,
{
    fn on_event(&self, event: &ProviderEvent) {
        self(event)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Listener registry.
#[derive(Default)]
pub(super) struct Listeners {
    entries: Mutex<Vec<(SubscriptionId, Arc<dyn ProviderListener>)>>,
    next_id: AtomicU64,
}

impl Listeners {
    pub fn add(&self, listener: Arc<dyn ProviderListener>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.lock().push((id, listener));
        id
    }

    pub fn remove(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        entries.len() < before
    }

    /// Deliver events in order. The registry lock is released first so
    /// listeners may subscribe or read provider state.
    pub fn emit(&self, events: &[ProviderEvent]) {
        if events.is_empty() {
            return;
        }
        let listeners: Vec<_> = self.entries.lock().iter().map(|(_, l)| Arc::clone(l)).collect();
        for event in events {
            for listener in &listeners {
                listener.on_event(event);
            }
        }
    }
}

/// Re-injects the runtime theme stylesheet whenever the theme changes.
pub struct ThemeApplier {
    sink: Arc<dyn StyleSink>,
}

impl ThemeApplier {
    pub fn new(sink: Arc<dyn StyleSink>) -> Self {
        Self { sink }
    }

    pub fn apply(&self, theme: &Theme) {
        apply_theme(theme, self.sink.as_ref());
    }
}

impl ProviderListener for ThemeApplier {
    fn on_event(&self, event: &ProviderEvent) {
        if let ProviderEvent::ThemeChanged(theme) = event {
            crate::debug!("theme"; "theme changed, re-applying styles");
            self.apply(theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{MemoryStyleSink, THEME_STYLE_ID, build_theme_css};

    #[test]
    fn test_listeners_add_remove_emit() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let listeners = Listeners::default();

        let sink = Arc::clone(&seen);
        let id = listeners.add(Arc::new(move |e: &ProviderEvent| sink.lock().push(e.clone())));
        listeners.emit(&[ProviderEvent::ContentChanged, ProviderEvent::AuthChanged(true)]);
        assert_eq!(seen.lock().len(), 2);

        assert!(listeners.remove(id));
        assert!(!listeners.remove(id));
        listeners.emit(&[ProviderEvent::SkillsChanged]);
        assert_eq!(seen.lock().len(), 2);
    }

    #[test]
    fn test_theme_applier_reacts_to_theme_only() {
        let sink = Arc::new(MemoryStyleSink::new());
        let applier = ThemeApplier::new(sink.clone());

        applier.on_event(&ProviderEvent::ContentChanged);
        assert!(sink.get(THEME_STYLE_ID).is_none());

        let theme = Theme::default();
        applier.on_event(&ProviderEvent::ThemeChanged(theme.clone()));
        assert_eq!(sink.get(THEME_STYLE_ID), Some(build_theme_css(&theme)));
    }
}
