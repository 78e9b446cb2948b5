// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted parameters and their serialized record form.
//!
//! An [`EncryptedParameter`] always holds plaintext in memory. Its serialized
//! [`ParameterRecord`] holds ciphertext when the parameter is marked
//! `encrypted` and an encryption context is active.
//!
//! # Writing
//!
//! - not `encrypted`: the value as-is
//! - no active context: the value as-is, or `null` under
//!   [`MissingContextPolicy::Withhold`]
//! - context not provisioned, or subsystem not ready: `null` (logged)
//! - any other provider failure: `null` (logged)
//!
//! # Reading
//!
//! The context provider is tried first. Values it cannot authenticate are
//! handed to the legacy codec under the scope's user key, so parameters
//! written before context-scoped encryption still load. Nothing that fails
//! here is fatal: the parameter comes back with no value.

use paramseal_config::MissingContextPolicy;
use paramseal_core::{EncryptionError, KeyError, ParamSealError, ParameterError};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::outcome::{DecryptOutcome, ValueSource};
use crate::scope::ExecutionScope;

/// A named configuration value that may be a secret.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedParameter {
    name: String,
    value: Option<String>,
    encrypted: bool,
    enabled: bool,
}

impl EncryptedParameter {
    /// A new, enabled parameter with no value.
    pub fn new(name: impl Into<String>, encrypted: bool) -> Result<Self, ParameterError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ParameterError::EmptyName);
        }
        Ok(Self {
            name,
            value: None,
            encrypted,
            enabled: true,
        })
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(Some(value.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Set the plaintext value.
    ///
    /// Values are trimmed; a value that is empty after trimming becomes `None`.
    pub fn set_value(&mut self, value: Option<String>) {
        self.value = value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
    }

    /// Serialize into a record, encrypting the value where required.
    pub fn encode(&self, scope: &ExecutionScope) -> ParameterRecord {
        ParameterRecord {
            name: self.name.clone(),
            value: self.encode_value(scope),
            encrypted: self.encrypted,
            enabled: self.enabled,
        }
    }

    fn encode_value(&self, scope: &ExecutionScope) -> Option<String> {
        let value = self.value.as_deref()?;
        if !self.encrypted {
            return Some(value.to_string());
        }

        let Some(context) = scope.current_context() else {
            return match scope.missing_context_policy() {
                MissingContextPolicy::Passthrough => Some(value.to_string()),
                MissingContextPolicy::Withhold => {
                    warn!(
                        parameter = %self.name,
                        "no encryption context active; value withheld"
                    );
                    None
                }
            };
        };

        match scope.seal(&context, value) {
            Ok(sealed) => Some(sealed),
            Err(err @ (EncryptionError::ContextNotFound(_) | EncryptionError::NotInitialized)) => {
                warn!(
                    parameter = %self.name,
                    context = %context,
                    error = %err,
                    "value not written: encryption services unavailable"
                );
                None
            }
            Err(err) => {
                error!(
                    parameter = %self.name,
                    context = %context,
                    error = %err,
                    "value not written: encryption failed"
                );
                None
            }
        }
    }

    /// Rebuild a parameter from its record, decrypting where required.
    pub fn decode(record: ParameterRecord, scope: &ExecutionScope) -> Result<Self, ParameterError> {
        Self::decode_with_source(record, scope).map(|(parameter, _)| parameter)
    }

    /// [`decode`](Self::decode), also reporting which path produced the value.
    pub fn decode_with_source(
        record: ParameterRecord,
        scope: &ExecutionScope,
    ) -> Result<(Self, ValueSource), ParameterError> {
        let mut parameter = Self::new(record.name, record.encrypted)?;
        parameter.enabled = record.enabled;
        let (value, source) = parameter.decode_value(record.value, scope);
        parameter.set_value(value);
        Ok((parameter, source))
    }

    /// Apply a late `encrypted = true` to a value that was read as plaintext.
    ///
    /// Record fields can arrive in any order. When the value was assigned
    /// before the flag, it still holds the stored ciphertext; turning the flag
    /// on runs the full decode on it. Only a `false` to `true` transition does
    /// anything, so repeated calls are harmless.
    ///
    /// Returns the decode path when a decode ran.
    pub fn set_encrypted(
        &mut self,
        encrypted: bool,
        scope: &ExecutionScope,
    ) -> Option<ValueSource> {
        let repair = encrypted && !self.encrypted;
        self.encrypted = encrypted;
        if !repair {
            return None;
        }
        let stored = self.value.take();
        let (value, source) = self.decode_value(stored, scope);
        self.set_value(value);
        Some(source)
    }

    /// Decode then encode: the record this parameter would be saved as today.
    pub fn reencode(
        record: ParameterRecord,
        scope: &ExecutionScope,
    ) -> Result<(ParameterRecord, ValueSource), ParameterError> {
        let (parameter, source) = Self::decode_with_source(record, scope)?;
        Ok((parameter.encode(scope), source))
    }

    fn decode_value(
        &self,
        stored: Option<String>,
        scope: &ExecutionScope,
    ) -> (Option<String>, ValueSource) {
        let Some(stored) = stored
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        else {
            return (None, ValueSource::Plain);
        };
        if !self.encrypted {
            return (Some(stored), ValueSource::Plain);
        }

        let Some(context) = scope.current_context() else {
            return match scope.missing_context_policy() {
                MissingContextPolicy::Passthrough => (Some(stored), ValueSource::Passthrough),
                MissingContextPolicy::Withhold => {
                    warn!(
                        parameter = %self.name,
                        "no encryption context active; stored value ignored"
                    );
                    (None, ValueSource::Withheld)
                }
            };
        };

        match scope.open(&context, &stored) {
            DecryptOutcome::Plaintext(plain) => (Some(plain), ValueSource::Modern),
            DecryptOutcome::ContextMissing => {
                warn!(
                    parameter = %self.name,
                    context = %context,
                    "value dropped: encryption context not found"
                );
                (None, ValueSource::Unreadable)
            }
            DecryptOutcome::SubsystemNotReady => {
                warn!(
                    parameter = %self.name,
                    context = %context,
                    "value dropped: encryption services not initialized"
                );
                (None, ValueSource::Unreadable)
            }
            DecryptOutcome::Malformed(cause) => self.decode_legacy(&stored, &cause, scope),
        }
    }

    fn decode_legacy(
        &self,
        stored: &str,
        modern_cause: &str,
        scope: &ExecutionScope,
    ) -> (Option<String>, ValueSource) {
        match paramseal_legacy::decrypt_with_user_key(stored, scope.keys()) {
            Ok(plain) => {
                info!(
                    parameter = %self.name,
                    "value read with legacy cipher; re-save to upgrade it"
                );
                (Some(plain), ValueSource::Legacy)
            }
            Err(ParamSealError::Key(KeyError::Unavailable)) => {
                warn!(
                    parameter = %self.name,
                    modern = %modern_cause,
                    "value dropped: no user key for the legacy cipher"
                );
                (None, ValueSource::Unreadable)
            }
            Err(legacy_err) => {
                error!(
                    parameter = %self.name,
                    modern = %modern_cause,
                    legacy = %legacy_err,
                    "value dropped: stored data could not be decrypted"
                );
                (None, ValueSource::Unreadable)
            }
        }
    }
}

impl std::fmt::Debug for EncryptedParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match (&self.value, self.encrypted) {
            (None, _) => None,
            (Some(_), true) => Some("[REDACTED]"),
            (Some(v), false) => Some(v.as_str()),
        };
        f.debug_struct("EncryptedParameter")
            .field("name", &self.name)
            .field("value", &value)
            .field("encrypted", &self.encrypted)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// The serialized form of a parameter.
///
/// `value` holds ciphertext for encrypted parameters written under a context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterRecord {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub encrypted: bool,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Assembles a parameter from fields that arrive in any order.
///
/// Nothing is decoded until [`finish`](Self::finish), so the `encrypted` flag
/// and the stored value can be supplied in either order with the same result.
#[derive(Default)]
pub struct ParameterBuilder {
    name: Option<String>,
    value: Option<String>,
    encrypted: Option<bool>,
    enabled: Option<bool>,
}

impl ParameterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The stored (possibly encrypted) value.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn encrypted(mut self, encrypted: bool) -> Self {
        self.encrypted = Some(encrypted);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn into_record(self) -> Result<ParameterRecord, ParameterError> {
        Ok(ParameterRecord {
            name: self.name.ok_or(ParameterError::MissingField("name"))?,
            value: self.value,
            encrypted: self.encrypted.unwrap_or(false),
            enabled: self.enabled.unwrap_or(true),
        })
    }

    /// Decode the collected fields into a parameter.
    pub fn finish(self, scope: &ExecutionScope) -> Result<EncryptedParameter, ParameterError> {
        let record = self.into_record()?;
        debug!(parameter = %record.name, "decoding parameter");
        EncryptedParameter::decode(record, scope)
    }
}

impl std::fmt::Debug for ParameterBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterBuilder")
            .field("name", &self.name)
            .field("value", &self.value.as_ref().map(|_| "[REDACTED]"))
            .field("encrypted", &self.encrypted)
            .field("enabled", &self.enabled)
            .finish()
    }
}
