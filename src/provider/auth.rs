//! Admin gate.
//!
//! A convenience gate for the editing surface, not a security boundary:
//! the passphrase is stored in plaintext next to the content, with no
//! hashing, rate limiting or expiry.

use super::ContentProvider;
use crate::storage::{KeyValueStore, StoreKey};

impl<S: KeyValueStore> ContentProvider<S> {
    pub fn is_authed(&self) -> bool {
        self.snapshot().authed
    }

    /// Whether a passphrase has been set yet.
    pub fn has_passphrase(&self) -> bool {
        self.gateway.load_raw(StoreKey::Passphrase).is_some()
    }

    /// Authenticate with `password`.
    ///
    /// The first call ever (no stored passphrase) adopts `password` as the
    /// passphrase. Later calls must match it exactly. Blank passwords are
    /// rejected. A failed attempt leaves the authenticated flag untouched.
    pub fn login(&self, password: &str) -> bool {
        if password.trim().is_empty() {
            return false;
        }

        match self.gateway.load_raw(StoreKey::Passphrase) {
            None => self.gateway.save_raw(StoreKey::Passphrase, password),
            Some(stored) if stored == password => {}
            Some(_) => return false,
        }

        self.gateway.save(StoreKey::Auth, &true);
        self.mutate(|state| state.authed = true);
        true
    }

    /// Clear the authenticated flag. The passphrase stays stored.
    pub fn logout(&self) {
        self.gateway.remove(StoreKey::Auth);
        self.mutate(|state| state.authed = false);
    }
}

#[cfg(test)]
mod tests {
    use crate::content::base_content;
    use crate::provider::{ContentProvider, ProviderEvent};
    use crate::storage::{Gateway, MemoryStore};
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn provider(store: Arc<MemoryStore>) -> ContentProvider<Arc<MemoryStore>> {
        ContentProvider::new(base_content().clone(), Gateway::new(store))
    }

    #[test]
    fn test_login_sequence() {
        let p = provider(Arc::new(MemoryStore::new()));
        assert!(!p.has_passphrase());

        assert!(p.login("secret"));
        assert!(p.is_authed());
        assert!(p.has_passphrase());

        p.logout();
        assert!(!p.is_authed());
        assert!(p.has_passphrase());

        assert!(!p.login("wrong"));
        assert!(!p.is_authed());
        assert!(!p.login("Secret"));

        assert!(p.login("secret"));
        assert!(p.is_authed());
    }

    #[test]
    fn test_blank_password_rejected() {
        let p = provider(Arc::new(MemoryStore::new()));
        assert!(!p.login(""));
        assert!(!p.login("   "));
        assert!(!p.is_authed());
        assert!(!p.has_passphrase());

        assert!(p.login("secret"));
        p.logout();
        assert!(!p.login(""));
        assert!(!p.login("anything"));
        assert!(!p.is_authed());
    }

    #[test]
    fn test_failed_login_keeps_authed_state() {
        let p = provider(Arc::new(MemoryStore::new()));
        assert!(p.login("secret"));
        assert!(!p.login("wrong"));
        assert!(p.is_authed());
    }

    #[test]
    fn test_auth_flag_persists_across_sessions() {
        let store = Arc::new(MemoryStore::new());
        assert!(provider(Arc::clone(&store)).login("secret"));
        assert!(provider(Arc::clone(&store)).is_authed());

        provider(Arc::clone(&store)).logout();
        let reopened = provider(store);
        assert!(!reopened.is_authed());
        assert!(!reopened.login("other"));
    }

    #[test]
    fn test_auth_events() {
        let p = provider(Arc::new(MemoryStore::new()));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        p.subscribe(Arc::new(move |e: &ProviderEvent| sink.lock().push(e.clone())));

        p.login("secret");
        p.login("secret");
        p.logout();
        assert_eq!(
            *seen.lock(),
            vec![ProviderEvent::AuthChanged(true), ProviderEvent::AuthChanged(false)]
        );
    }
}
