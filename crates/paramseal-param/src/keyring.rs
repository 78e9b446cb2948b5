// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context key ring: the installation's set of provisioned encryption contexts.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use paramseal_config::ParamSealConfig;
use paramseal_config::model::ContextConfig;
use paramseal_core::{
    ContextEncryptionProvider, ContextId, EncryptionError, EncryptionProviderFactory,
    ParamSealError,
};
use secrecy::ExposeSecret;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::provider::{AesGcmProvider, CONTEXT_KEY_LEN};

type ContextKey = Zeroizing<[u8; CONTEXT_KEY_LEN]>;

/// Maps context ids to AES-256-GCM keys and hands out providers for them.
///
/// Until [`mark_initialized`](Self::mark_initialized) is called (or the ring
/// is built initialized), every lookup fails with
/// [`EncryptionError::NotInitialized`].
pub struct ContextKeyRing {
    keys: HashMap<ContextId, ContextKey>,
    initialized: AtomicBool,
}

impl ContextKeyRing {
    /// An empty, initialized ring.
    pub fn new() -> Self {
        Self {
            keys: HashMap::new(),
            initialized: AtomicBool::new(true),
        }
    }

    /// An empty ring that reports "not initialized" until marked ready.
    pub fn uninitialized() -> Self {
        Self {
            keys: HashMap::new(),
            initialized: AtomicBool::new(false),
        }
    }

    pub fn with_context(
        mut self,
        context: impl Into<ContextId>,
        key: [u8; CONTEXT_KEY_LEN],
    ) -> Self {
        self.insert(context, key);
        self
    }

    /// Add or replace the key for a context.
    pub fn insert(&mut self, context: impl Into<ContextId>, key: [u8; CONTEXT_KEY_LEN]) {
        self.keys.insert(context.into(), Zeroizing::new(key));
    }

    pub fn mark_initialized(&self) {
        self.initialized.store(true, Ordering::Release);
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub fn contains(&self, context: &ContextId) -> bool {
        self.keys.contains_key(context)
    }

    /// Provisioned context ids, sorted.
    pub fn context_ids(&self) -> Vec<&ContextId> {
        let mut ids: Vec<_> = self.keys.keys().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Build the ring from `[[contexts]]`, resolving inline and env keys.
    ///
    /// Error messages name the context and never the key material.
    pub fn from_config(config: &ParamSealConfig) -> Result<Self, ParamSealError> {
        let mut ring = if config.encryption.initialized {
            Self::new()
        } else {
            Self::uninitialized()
        };
        for context in &config.contexts {
            let key = resolve_context_key(context)?;
            let id = context.id.trim();
            debug!(context = %id, "context key loaded");
            ring.insert(id, *key);
        }
        info!(
            contexts = ring.len(),
            initialized = ring.is_initialized(),
            "context key ring ready"
        );
        Ok(ring)
    }
}

impl Default for ContextKeyRing {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContextKeyRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextKeyRing")
            .field("contexts", &self.context_ids())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl EncryptionProviderFactory for ContextKeyRing {
    fn provider_for(
        &self,
        context: &ContextId,
    ) -> Result<Box<dyn ContextEncryptionProvider>, EncryptionError> {
        if !self.is_initialized() {
            return Err(EncryptionError::NotInitialized);
        }
        let key = self
            .keys
            .get(context)
            .ok_or_else(|| EncryptionError::ContextNotFound(context.clone()))?;
        Ok(Box::new(AesGcmProvider::new(context.clone(), key)?))
    }
}

fn resolve_context_key(context: &ContextConfig) -> Result<ContextKey, ParamSealError> {
    let hex_key = match (&context.key_hex, &context.key_env) {
        (Some(inline), None) => Zeroizing::new(inline.expose_secret().trim().to_string()),
        (None, Some(var)) => Zeroizing::new(
            std::env::var(var)
                .map_err(|_| {
                    ParamSealError::Config(format!(
                        "context `{}`: environment variable `{var}` is not set",
                        context.id
                    ))
                })?
                .trim()
                .to_string(),
        ),
        _ => {
            return Err(ParamSealError::Config(format!(
                "context `{}` needs exactly one of key_hex and key_env",
                context.id
            )));
        }
    };

    let bytes = Zeroizing::new(hex::decode(hex_key.as_str()).map_err(|_| {
        ParamSealError::Config(format!("context `{}`: key is not valid hex", context.id))
    })?);
    let mut key = Zeroizing::new([0u8; CONTEXT_KEY_LEN]);
    if bytes.len() != CONTEXT_KEY_LEN {
        return Err(ParamSealError::Config(format!(
            "context `{}`: key must be {CONTEXT_KEY_LEN} bytes, got {}",
            context.id,
            bytes.len()
        )));
    }
    key.copy_from_slice(&bytes);
    Ok(key)
}
