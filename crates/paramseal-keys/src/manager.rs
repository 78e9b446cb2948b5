// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-scope user key cache.
//!
//! A [`KeyManager`] belongs to one execution scope (a session, a worker, a
//! test). Two scopes never share a cache, so a tenant-specific key set on one
//! scope is invisible to every other. A new scope either calls
//! [`KeyManager::inherit`] or resolves its key again from storage.
//!
//! Per scope the cache moves `NO_KEY -> KEY_CACHED` either by loading from
//! the store or by generating a new key. Once cached, the key only changes
//! through [`KeyManager::set_user_key`] or [`KeyManager::create_and_store_key`].

use std::sync::{Arc, PoisonError, RwLock};

use paramseal_core::{Key, KeyError, KeyStoreProvider};
use tracing::{debug, info, warn};

/// Cache of "the current user key" for one execution scope.
pub struct KeyManager {
    provider: Arc<dyn KeyStoreProvider>,
    cached: RwLock<Option<Key>>,
    persist: bool,
}

impl std::fmt::Debug for KeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyManager")
            .field("location", &self.provider.location())
            .field("cached", &self.has_cached_key())
            .field("persist", &self.persist)
            .finish()
    }
}

impl KeyManager {
    /// A manager with an empty cache that persists generated keys.
    pub fn new(provider: Arc<dyn KeyStoreProvider>) -> Self {
        Self {
            provider,
            cached: RwLock::new(None),
            persist: true,
        }
    }

    /// Opt this scope out of persisting generated keys.
    pub fn without_persistence(mut self) -> Self {
        self.persist = false;
        self
    }

    pub fn persists(&self) -> bool {
        self.persist
    }

    /// Human-readable location of the backing store.
    pub fn location(&self) -> String {
        self.provider.location()
    }

    /// A manager for another scope, sharing the store and starting from this
    /// scope's cached key (if any).
    pub fn inherit(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            cached: RwLock::new(self.cached_key()),
            persist: self.persist,
        }
    }

    /// The scope's cached key, loading it from the store on first use.
    ///
    /// Fails with [`KeyError::Unavailable`] when nothing is cached and nothing
    /// is stored.
    pub fn user_key(&self) -> Result<Key, KeyError> {
        if let Some(key) = self.cached_key() {
            return Ok(key);
        }

        match self.provider.load()? {
            Some(key) => {
                debug!(location = %self.provider.location(), "user key loaded into scope cache");
                self.cache(key.clone());
                Ok(key)
            }
            None => Err(KeyError::Unavailable),
        }
    }

    /// Override the scope's key without touching storage.
    pub fn set_user_key(&self, key: Key) {
        debug!(algorithm = %key.algorithm(), "user key overridden for scope");
        self.cache(key);
    }

    /// Generate a key, persist it unless this scope opted out, and cache it.
    ///
    /// A store that reports itself not writable is skipped with a log line;
    /// the key still becomes the scope's key.
    pub fn create_and_store_key(&self) -> Result<Key, KeyError> {
        let key = self.provider.generate()?;

        if !self.persist {
            debug!("key persistence disabled for this scope");
        } else if !self.provider.is_writable() {
            warn!(
                location = %self.provider.location(),
                "key store is not writable; keeping generated key in memory only"
            );
        } else {
            self.provider.store(&key)?;
        }

        info!(algorithm = %key.algorithm(), "new user key created");
        self.cache(key.clone());
        Ok(key)
    }

    /// The scope's key, generating (and storing) one if none exists anywhere.
    pub fn user_key_or_create(&self) -> Result<Key, KeyError> {
        match self.user_key() {
            Err(KeyError::Unavailable) => self.create_and_store_key(),
            other => other,
        }
    }

    pub fn has_cached_key(&self) -> bool {
        self.cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn cached_key(&self) -> Option<Key> {
        self.cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn cache(&self, key: Key) {
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = Some(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryKeyStore, generate_key};
    use paramseal_core::KeyAlgorithm;

    /// Store that counts loads, to prove the cache is used.
    struct CountingStore {
        inner: MemoryKeyStore,
        loads: std::sync::atomic::AtomicUsize,
    }

    impl KeyStoreProvider for CountingStore {
        fn generate(&self) -> Result<Key, KeyError> {
            self.inner.generate()
        }
        fn store(&self, key: &Key) -> Result<(), KeyError> {
            self.inner.store(key)
        }
        fn load(&self) -> Result<Option<Key>, KeyError> {
            self.loads
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.inner.load()
        }
        fn location(&self) -> String {
            "counting".to_string()
        }
    }

    #[test]
    fn user_key_without_any_key_is_unavailable() {
        let manager = KeyManager::new(Arc::new(MemoryKeyStore::new()));
        assert!(matches!(manager.user_key(), Err(KeyError::Unavailable)));
        assert!(!manager.has_cached_key());
    }

    #[test]
    fn user_key_loads_once_then_uses_cache() {
        let key = generate_key(KeyAlgorithm::Aes128).unwrap();
        let store = Arc::new(CountingStore {
            inner: MemoryKeyStore::with_key(key.clone()),
            loads: Default::default(),
        });
        let manager = KeyManager::new(store.clone());

        assert_eq!(manager.user_key().unwrap(), key);
        assert_eq!(manager.user_key().unwrap(), key);
        assert_eq!(store.loads.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn set_user_key_does_not_touch_storage() {
        let store = Arc::new(MemoryKeyStore::new());
        let manager = KeyManager::new(store.clone());

        let key = generate_key(KeyAlgorithm::Aes128).unwrap();
        manager.set_user_key(key.clone());

        assert_eq!(manager.user_key().unwrap(), key);
        assert!(store.is_empty());
    }

    #[test]
    fn create_and_store_persists_and_caches() {
        let store = Arc::new(MemoryKeyStore::new());
        let manager = KeyManager::new(store.clone());

        let key = manager.create_and_store_key().unwrap();
        assert_eq!(manager.user_key().unwrap(), key);
        assert_eq!(store.load().unwrap(), Some(key));
    }

    #[test]
    fn opted_out_scope_does_not_persist() {
        let store = Arc::new(MemoryKeyStore::new());
        let manager = KeyManager::new(store.clone()).without_persistence();

        let key = manager.create_and_store_key().unwrap();
        assert_eq!(manager.user_key().unwrap(), key);
        assert!(store.is_empty());
    }

    #[test]
    fn read_only_store_is_skipped_without_error() {
        let store = Arc::new(MemoryKeyStore::new().read_only());
        let manager = KeyManager::new(store.clone());

        let key = manager.create_and_store_key().unwrap();
        assert_eq!(manager.user_key().unwrap(), key);
        assert!(store.is_empty());
    }

    #[test]
    fn user_key_or_create_prefers_stored_key() {
        let stored = generate_key(KeyAlgorithm::Aes128).unwrap();
        let manager = KeyManager::new(Arc::new(MemoryKeyStore::with_key(stored.clone())));
        assert_eq!(manager.user_key_or_create().unwrap(), stored);
    }

    #[test]
    fn user_key_or_create_generates_when_empty() {
        let store = Arc::new(MemoryKeyStore::new());
        let manager = KeyManager::new(store.clone());
        let key = manager.user_key_or_create().unwrap();
        assert_eq!(store.load().unwrap(), Some(key));
    }

    #[test]
    fn scopes_do_not_share_cached_keys() {
        let store: Arc<dyn KeyStoreProvider> = Arc::new(MemoryKeyStore::new());
        let first = KeyManager::new(Arc::clone(&store));
        let second = KeyManager::new(Arc::clone(&store));

        let tenant_key = generate_key(KeyAlgorithm::Aes128).unwrap();
        first.set_user_key(tenant_key.clone());

        assert_eq!(first.user_key().unwrap(), tenant_key);
        assert!(matches!(second.user_key(), Err(KeyError::Unavailable)));
    }

    #[test]
    fn inherit_copies_the_cached_key() {
        let parent = KeyManager::new(Arc::new(MemoryKeyStore::new())).without_persistence();
        let key = parent.create_and_store_key().unwrap();

        let child = parent.inherit();
        assert_eq!(child.user_key().unwrap(), key);
        assert!(!child.persists());

        // Later overrides on the child stay local to it.
        let other = generate_key(KeyAlgorithm::Aes128).unwrap();
        child.set_user_key(other.clone());
        assert_eq!(parent.user_key().unwrap(), key);
        assert_eq!(child.user_key().unwrap(), other);
    }

    #[test]
    fn debug_output_has_no_key_material() {
        let manager = KeyManager::new(Arc::new(MemoryKeyStore::new()));
        manager.create_and_store_key().unwrap();
        let debug = format!("{manager:?}");
        assert!(debug.contains("cached: true"));
        assert!(debug.contains("memory"));
    }
}
