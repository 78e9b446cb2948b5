// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Execution scope: everything a unit of work needs to encrypt or decrypt.
//!
//! A scope is passed explicitly to every encode and decode call. Work handed
//! to another thread takes an [`inherit`](ExecutionScope::inherit)ed copy, so
//! the user key and context follow the task rather than the thread.

use std::str::FromStr;
use std::sync::Arc;

use paramseal_config::{MissingContextPolicy, ParamSealConfig};
use paramseal_core::{
    ContextId, EncryptionContextLookup, EncryptionError, EncryptionProviderFactory, KeyAlgorithm,
    KeyStoreProvider, ParamSealError,
};
use paramseal_keys::{FileKeyStore, KeyManager, MemoryKeyStore, default_key_path};
use tracing::{debug, warn};

use crate::keyring::ContextKeyRing;
use crate::outcome::DecryptOutcome;

/// A context lookup that always answers the same thing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticContext(Option<ContextId>);

impl StaticContext {
    pub fn new(context: impl Into<ContextId>) -> Self {
        Self(Some(context.into()))
    }

    /// No context is ever active.
    pub fn none() -> Self {
        Self(None)
    }
}

impl EncryptionContextLookup for StaticContext {
    fn current_context(&self) -> Option<ContextId> {
        self.0.clone()
    }
}

pub struct ExecutionScope {
    keys: KeyManager,
    context: Arc<dyn EncryptionContextLookup>,
    providers: Arc<dyn EncryptionProviderFactory>,
    missing_context: MissingContextPolicy,
}

impl ExecutionScope {
    pub fn new(
        keys: KeyManager,
        context: Arc<dyn EncryptionContextLookup>,
        providers: Arc<dyn EncryptionProviderFactory>,
    ) -> Self {
        Self {
            keys,
            context,
            providers,
            missing_context: MissingContextPolicy::default(),
        }
    }

    pub fn with_missing_context_policy(mut self, policy: MissingContextPolicy) -> Self {
        self.missing_context = policy;
        self
    }

    /// Build the process scope from validated configuration.
    ///
    /// The key store is the configured file, or the default location. With
    /// no resolvable home directory the user key lives in memory only.
    pub fn from_config(config: &ParamSealConfig) -> Result<Self, ParamSealError> {
        let algorithm = KeyAlgorithm::from_str(&config.keystore.algorithm).map_err(|_| {
            ParamSealError::Config(format!(
                "unknown key algorithm `{}`",
                config.keystore.algorithm
            ))
        })?;

        let path = config
            .keystore
            .path
            .as_ref()
            .map(std::path::PathBuf::from)
            .or_else(default_key_path);
        let store: Arc<dyn KeyStoreProvider> = match path {
            Some(path) => Arc::new(FileKeyStore::new(path).with_algorithm(algorithm)),
            None => {
                warn!("no data directory found; user key will not survive restarts");
                Arc::new(MemoryKeyStore::new().with_algorithm(algorithm))
            }
        };

        let mut keys = KeyManager::new(store);
        if !config.keystore.persist {
            keys = keys.without_persistence();
        }

        let context: Arc<dyn EncryptionContextLookup> = match &config.encryption.context {
            Some(id) => Arc::new(StaticContext::new(id.trim())),
            None => Arc::new(StaticContext::none()),
        };

        let ring = ContextKeyRing::from_config(config)?;
        Ok(Self::new(keys, context, Arc::new(ring))
            .with_missing_context_policy(config.encryption.on_missing_context))
    }

    /// A scope for work started from this one, possibly on another thread.
    ///
    /// The child sees this scope's cached user key and context, and changes it
    /// makes to its own key cache stay local.
    pub fn inherit(&self) -> Self {
        Self {
            keys: self.keys.inherit(),
            context: Arc::clone(&self.context),
            providers: Arc::clone(&self.providers),
            missing_context: self.missing_context,
        }
    }

    /// Like [`inherit`](Self::inherit) but pinned to `context`.
    pub fn for_context(&self, context: impl Into<ContextId>) -> Self {
        Self {
            context: Arc::new(StaticContext::new(context)),
            ..self.inherit()
        }
    }

    /// Like [`inherit`](Self::inherit) but with no active context.
    pub fn without_context(&self) -> Self {
        Self {
            context: Arc::new(StaticContext::none()),
            ..self.inherit()
        }
    }

    pub fn keys(&self) -> &KeyManager {
        &self.keys
    }

    pub fn current_context(&self) -> Option<ContextId> {
        self.context.current_context()
    }

    pub fn missing_context_policy(&self) -> MissingContextPolicy {
        self.missing_context
    }

    /// Encrypt with the context's provider and return its textual form.
    pub(crate) fn seal(
        &self,
        context: &ContextId,
        plaintext: &str,
    ) -> Result<String, EncryptionError> {
        let provider = self.providers.provider_for(context)?;
        let sealed = provider.encrypt_string(plaintext.as_bytes())?;
        Ok(provider.encode_to_base64(&sealed))
    }

    /// Decode and decrypt with the context's provider.
    pub(crate) fn open(&self, context: &ContextId, text: &str) -> DecryptOutcome {
        let provider = match self.providers.provider_for(context) {
            Ok(provider) => provider,
            Err(err) => return err.into(),
        };
        let opened = provider
            .decode_from_base64(text)
            .and_then(|bytes| provider.decrypt_string(&bytes))
            .and_then(|plain| {
                String::from_utf8(plain).map_err(|_| {
                    EncryptionError::Failed("decrypted value is not valid UTF-8".to_string())
                })
            });
        if let Err(err) = &opened {
            debug!(context = %context, error = %err, "context provider rejected value");
        }
        opened.into()
    }
}

impl std::fmt::Debug for ExecutionScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionScope")
            .field("keys", &self.keys)
            .field("context", &self.current_context())
            .field("missing_context", &self.missing_context)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use paramseal_keys::generate_key;

    use super::*;

    fn scope() -> ExecutionScope {
        let ring = ContextKeyRing::new().with_context("ctx-1", [3u8; 32]);
        ExecutionScope::new(
            KeyManager::new(Arc::new(MemoryKeyStore::new())),
            Arc::new(StaticContext::new("ctx-1")),
            Arc::new(ring),
        )
    }

    #[test]
    fn seal_then_open_under_same_context() {
        let scope = scope();
        let ctx = ContextId::from("ctx-1");
        let sealed = scope.seal(&ctx, "token").unwrap();
        assert_eq!(
            scope.open(&ctx, &sealed),
            DecryptOutcome::Plaintext("token".into())
        );
    }

    #[test]
    fn open_reports_missing_context() {
        let scope = scope();
        assert_eq!(
            scope.open(&ContextId::from("ctx-2"), "AAAA"),
            DecryptOutcome::ContextMissing
        );
    }

    #[test]
    fn open_reports_malformed_input() {
        let scope = scope();
        assert!(matches!(
            scope.open(&ContextId::from("ctx-1"), "%%%"),
            DecryptOutcome::Malformed(_)
        ));
    }

    #[test]
    fn closures_work_as_context_lookups() {
        let scope = ExecutionScope::new(
            KeyManager::new(Arc::new(MemoryKeyStore::new())),
            Arc::new(|| Some(ContextId::from("from-closure"))),
            Arc::new(ContextKeyRing::new()),
        );
        assert_eq!(
            scope.current_context(),
            Some(ContextId::from("from-closure"))
        );
    }

    #[test]
    fn inherited_scope_sees_parent_key_but_not_later_overrides() {
        let parent = scope();
        let key = generate_key(KeyAlgorithm::Aes128).unwrap();
        parent.keys().set_user_key(key.clone());

        let child = parent.inherit();
        assert_eq!(child.keys().user_key().unwrap(), key);

        child
            .keys()
            .set_user_key(generate_key(KeyAlgorithm::Aes128).unwrap());
        assert_eq!(parent.keys().user_key().unwrap(), key);
    }

    #[test]
    fn context_overrides_leave_parent_alone() {
        let parent = scope();
        assert_eq!(
            parent.for_context("ctx-2").current_context(),
            Some(ContextId::from("ctx-2"))
        );
        assert_eq!(parent.without_context().current_context(), None);
        assert_eq!(parent.current_context(), Some(ContextId::from("ctx-1")));
    }

    #[test]
    fn from_config_uses_configured_store_and_policy() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ParamSealConfig::default();
        config.keystore.path = Some(dir.path().join("user.key").display().to_string());
        config.keystore.algorithm = "AES-256".to_string();
        config.encryption.context = Some("ctx-1".to_string());
        config.encryption.on_missing_context = MissingContextPolicy::Withhold;

        let scope = ExecutionScope::from_config(&config).unwrap();
        assert_eq!(scope.current_context(), Some(ContextId::from("ctx-1")));
        assert_eq!(scope.missing_context_policy(), MissingContextPolicy::Withhold);

        let key = scope.keys().user_key_or_create().unwrap();
        assert_eq!(key.algorithm(), KeyAlgorithm::Aes256);
        assert!(dir.path().join("user.key").exists());
    }
}
