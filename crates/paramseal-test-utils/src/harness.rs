// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Execution scopes for tests.
//!
//! `TestScope` wires a context key ring, a user key and a context lookup into
//! an [`ExecutionScope`]. Context keys are derived from the context id, so two
//! scopes built with the same ids can read each other's values.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use paramseal_config::MissingContextPolicy;
use paramseal_core::{KeyAlgorithm, KeyError, KeyStoreProvider};
use paramseal_keys::{FileKeyStore, KeyManager, MemoryKeyStore, generate_key};
use paramseal_param::{ContextKeyRing, ExecutionScope, StaticContext};

/// Builder for test scopes.
pub struct TestScopeBuilder {
    contexts: Vec<String>,
    active: Option<String>,
    policy: MissingContextPolicy,
    initialized: bool,
    user_key: bool,
    file_backed: bool,
}

impl TestScopeBuilder {
    fn new() -> Self {
        Self {
            contexts: Vec::new(),
            active: None,
            policy: MissingContextPolicy::Passthrough,
            initialized: true,
            user_key: true,
            file_backed: false,
        }
    }

    /// Provision a context in the key ring.
    pub fn with_context(mut self, id: &str) -> Self {
        self.contexts.push(id.to_string());
        self
    }

    /// Make `id` the active context. It need not be provisioned.
    pub fn active_context(mut self, id: &str) -> Self {
        self.active = Some(id.to_string());
        self
    }

    pub fn missing_context_policy(mut self, policy: MissingContextPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build the key ring in the "not initialized" state.
    pub fn uninitialized(mut self) -> Self {
        self.initialized = false;
        self
    }

    /// Start with no user key cached or stored.
    pub fn without_user_key(mut self) -> Self {
        self.user_key = false;
        self
    }

    /// Keep the user key in a file under a temp directory.
    pub fn file_backed(mut self) -> Self {
        self.file_backed = true;
        self
    }

    pub fn build(self) -> Result<TestScope, KeyError> {
        let temp_dir = tempfile::TempDir::new()
            .map_err(|e| KeyError::Storage(format!("temp dir: {e}")))?;
        let key_path = temp_dir.path().join("keys").join("user.key");

        let store: Arc<dyn KeyStoreProvider> = if self.file_backed {
            Arc::new(FileKeyStore::new(&key_path))
        } else {
            Arc::new(MemoryKeyStore::new())
        };
        let keys = KeyManager::new(store);
        if self.user_key {
            if self.file_backed {
                keys.create_and_store_key()?;
            } else {
                keys.set_user_key(generate_key(KeyAlgorithm::Aes128)?);
            }
        }

        let mut ring = if self.initialized {
            ContextKeyRing::new()
        } else {
            ContextKeyRing::uninitialized()
        };
        for id in &self.contexts {
            ring.insert(id.as_str(), context_key(id));
        }

        let lookup = match &self.active {
            Some(id) => StaticContext::new(id.as_str()),
            None => StaticContext::none(),
        };

        tracing::debug!(contexts = ?self.contexts, active = ?self.active, "test scope built");
        let scope = ExecutionScope::new(keys, Arc::new(lookup), Arc::new(ring))
            .with_missing_context_policy(self.policy);
        Ok(TestScope {
            scope,
            key_path,
            _temp_dir: temp_dir,
        })
    }
}

/// Deterministic 32-byte key for a context id.
pub fn context_key(id: &str) -> [u8; 32] {
    let mut key = [0u8; 32];
    for (i, byte) in id.bytes().cycle().take(32).enumerate() {
        key[i] = byte.wrapping_add(i as u8);
    }
    key
}

/// A scope plus the temp directory backing it.
pub struct TestScope {
    scope: ExecutionScope,
    key_path: PathBuf,
    _temp_dir: tempfile::TempDir,
}

impl TestScope {
    pub fn builder() -> TestScopeBuilder {
        TestScopeBuilder::new()
    }

    /// One provisioned, active context.
    pub fn with_active_context(id: &str) -> Result<Self, KeyError> {
        Self::builder().with_context(id).active_context(id).build()
    }

    pub fn scope(&self) -> &ExecutionScope {
        &self.scope
    }

    /// Where a file-backed scope keeps its user key.
    pub fn key_path(&self) -> &Path {
        &self.key_path
    }
}

impl std::ops::Deref for TestScope {
    type Target = ExecutionScope;

    fn deref(&self) -> &ExecutionScope {
        &self.scope
    }
}
