// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encryption-context lookup.

use crate::types::ContextId;

/// Resolves the encryption context of the current execution scope.
///
/// Called on every encode and decode; the result is never cached by the
/// parameter contract.
pub trait EncryptionContextLookup: Send + Sync {
    /// The active context, or `None` when no encryption service is resolvable.
    fn current_context(&self) -> Option<ContextId>;
}

impl<F> EncryptionContextLookup for F
where
    F: Fn() -> Option<ContextId> + Send + Sync,
{
    fn current_context(&self) -> Option<ContextId> {
        self()
    }
}
