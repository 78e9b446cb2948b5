// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for paramseal.
//!
//! Holds the error taxonomy, the [`Key`] and [`ContextId`] types, and the
//! traits through which the parameter contract reaches its collaborators:
//! key storage, context lookup, and context-scoped encryption providers.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CipherError, EncryptionError, KeyError, ParamSealError, ParameterError};
pub use types::{ContextId, Key, KeyAlgorithm};

pub use traits::{
    ContextEncryptionProvider, EncryptionContextLookup, EncryptionProviderFactory,
    KeyStoreProvider,
};
