// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key store trait for the single persisted user key.

use crate::error::KeyError;
use crate::types::Key;

/// Creates, persists and loads one raw symmetric key at a fixed location.
///
/// Swappable so tests can keep keys in memory instead of on disk.
pub trait KeyStoreProvider: Send + Sync {
    /// Generates a fresh key. Does not persist it.
    fn generate(&self) -> Result<Key, KeyError>;

    /// Persists `key`, replacing any previously stored key.
    fn store(&self, key: &Key) -> Result<(), KeyError>;

    /// Loads the stored key, or `Ok(None)` if nothing has been stored yet.
    fn load(&self) -> Result<Option<Key>, KeyError>;

    /// Whether [`store`](Self::store) can succeed in this environment.
    ///
    /// The key manager skips persistence (and only logs) when this is false.
    fn is_writable(&self) -> bool {
        true
    }

    /// Human-readable location of the stored key, for logs and diagnostics.
    fn location(&self) -> String;
}
