// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the key, legacy and parameter crates.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use zeroize::Zeroizing;

use crate::error::KeyError;

/// Identifier of an encryption context (the key/policy scope of a session).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(String);

impl ContextId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContextId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ContextId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Symmetric algorithm a [`Key`] is meant for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum KeyAlgorithm {
    #[strum(serialize = "AES-128")]
    Aes128,
    #[strum(serialize = "AES-256")]
    Aes256,
}

impl KeyAlgorithm {
    /// Raw key length in bytes.
    pub const fn key_len(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes256 => 32,
        }
    }

    /// Infer the algorithm from a raw key length.
    pub fn from_key_len(len: usize) -> Option<Self> {
        match len {
            16 => Some(Self::Aes128),
            32 => Some(Self::Aes256),
            _ => None,
        }
    }
}

/// Raw symmetric key bytes plus the algorithm they belong to.
///
/// A key read back from storage and a freshly generated key are the same
/// shape; nothing records where a key came from. Bytes are zeroed on drop
/// and never appear in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Key {
    algorithm: KeyAlgorithm,
    bytes: Zeroizing<Vec<u8>>,
}

impl Key {
    /// Build a key, checking that the length matches the algorithm.
    pub fn new(algorithm: KeyAlgorithm, bytes: Vec<u8>) -> Result<Self, KeyError> {
        let bytes = Zeroizing::new(bytes);
        if bytes.len() != algorithm.key_len() {
            return Err(KeyError::Load(format!(
                "{algorithm} key must be {} bytes, got {}",
                algorithm.key_len(),
                bytes.len()
            )));
        }
        Ok(Self { algorithm, bytes })
    }

    /// Build a key from a raw blob, inferring the algorithm from its length.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, KeyError> {
        let algorithm = KeyAlgorithm::from_key_len(bytes.len()).ok_or_else(|| {
            KeyError::Load(format!("unsupported key length {}", bytes.len()))
        })?;
        Self::new(algorithm, bytes)
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("algorithm", &self.algorithm)
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
