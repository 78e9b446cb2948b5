// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the paramseal workspace.
//!
//! Each boundary has its own enum so callers can match on exactly the
//! failures that boundary produces. [`ParamSealError`] collects all of them
//! for code that only needs to report.

use thiserror::Error;

use crate::types::ContextId;

/// Failures at the key lifecycle / key store boundary.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The random source or key construction failed.
    #[error("key generation failed: {0}")]
    Generation(String),

    /// The key could not be written to its store.
    #[error("key storage failed: {0}")]
    Storage(String),

    /// A stored key exists but could not be read back intact.
    #[error("key load failed: {0}")]
    Load(String),

    /// No key is cached and none exists in storage.
    ///
    /// Callers treat this as "encryption services not ready".
    #[error("no user key available")]
    Unavailable,
}

/// The single failure kind of the legacy cipher codec.
///
/// Unknown algorithm, bad key, malformed ciphertext and bad padding all
/// collapse here. None of them succeed on retry.
#[derive(Debug, Error)]
#[error("legacy cipher failure: {cause}")]
pub struct CipherError {
    /// Human-readable description of what went wrong.
    pub cause: String,
}

impl CipherError {
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }
}

/// Failures of the context-scoped encryption provider.
#[derive(Debug, Error)]
pub enum EncryptionError {
    /// The context identifier is not known to this installation.
    #[error("encryption context `{0}` not found")]
    ContextNotFound(ContextId),

    /// The encryption subsystem has not been initialized yet.
    #[error("encryption subsystem not initialized")]
    NotInitialized,

    /// Any other provider failure (bad base64, authentication failure, ...).
    #[error("encryption failed: {0}")]
    Failed(String),
}

/// Failures building or (de)serializing an encrypted parameter.
#[derive(Debug, Error)]
pub enum ParameterError {
    /// Parameter names must be non-empty after trimming.
    #[error("parameter name must not be empty")]
    EmptyName,

    /// A required record field was never supplied.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// The serialized record was not valid JSON of the expected shape.
    #[error("invalid parameter record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Umbrella error for binaries and high-level entry points.
#[derive(Debug, Error)]
pub enum ParamSealError {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Encryption(#[from] EncryptionError),

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// Configuration errors (invalid TOML, bad key material, ...).
    #[error("configuration error: {0}")]
    Config(String),

    /// File system errors outside the key store (reading input files, ...).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
