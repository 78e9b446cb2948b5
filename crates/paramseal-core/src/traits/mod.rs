// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits at the seams of the subsystem.
//!
//! The key store, the encryption-context lookup and the context-scoped
//! provider are all supplied from outside the parameter contract, so each
//! gets a trait here and concrete implementations live in their own crates.

pub mod context;
pub mod key_store;
pub mod provider;

pub use context::EncryptionContextLookup;
pub use key_store::KeyStoreProvider;
pub use provider::{ContextEncryptionProvider, EncryptionProviderFactory};
