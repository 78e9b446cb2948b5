// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider factory that fails on demand.
//!
//! Wraps a real [`ContextKeyRing`] so successful calls behave normally, and
//! counts how many providers were requested.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use paramseal_core::{
    ContextEncryptionProvider, ContextId, EncryptionError, EncryptionProviderFactory,
};
use paramseal_param::ContextKeyRing;

/// How the next lookups should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    ContextNotFound,
    NotInitialized,
    /// Construction succeeds but every encrypt/decrypt fails.
    Broken,
}

pub struct MockProviders {
    inner: ContextKeyRing,
    failure: Mutex<Option<Failure>>,
    requests: AtomicUsize,
}

impl MockProviders {
    pub fn new(inner: ContextKeyRing) -> Self {
        Self {
            inner,
            failure: Mutex::new(None),
            requests: AtomicUsize::new(0),
        }
    }

    /// Make every following lookup fail with `failure` (or succeed, for `None`).
    pub fn fail_with(&self, failure: Option<Failure>) {
        *self
            .failure
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = failure;
    }

    /// Number of `provider_for` calls so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl EncryptionProviderFactory for MockProviders {
    fn provider_for(
        &self,
        context: &ContextId,
    ) -> Result<Box<dyn ContextEncryptionProvider>, EncryptionError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let failure = *self
            .failure
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match failure {
            None => self.inner.provider_for(context),
            Some(Failure::ContextNotFound) => {
                Err(EncryptionError::ContextNotFound(context.clone()))
            }
            Some(Failure::NotInitialized) => Err(EncryptionError::NotInitialized),
            Some(Failure::Broken) => Ok(Box::new(BrokenProvider)),
        }
    }
}

struct BrokenProvider;

impl ContextEncryptionProvider for BrokenProvider {
    fn encrypt_string(&self, _plaintext: &[u8]) -> Result<Vec<u8>, EncryptionError> {
        Err(EncryptionError::Failed("provider is broken".to_string()))
    }

    fn decrypt_string(&self, _ciphertext: &[u8]) -> Result<Vec<u8>, EncryptionError> {
        Err(EncryptionError::Failed("provider is broken".to_string()))
    }

    fn encode_to_base64(&self, _bytes: &[u8]) -> String {
        String::new()
    }

    fn decode_from_base64(&self, _text: &str) -> Result<Vec<u8>, EncryptionError> {
        Err(EncryptionError::Failed("provider is broken".to_string()))
    }
}
