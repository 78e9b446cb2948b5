// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Results of decrypting one stored value.

use paramseal_core::EncryptionError;
use serde::Serialize;

/// What a context-scoped decryption attempt produced.
///
/// The first three variants are expected states of a running installation.
/// Only `Malformed` sends the decoder on to the legacy codec.
#[derive(Clone, PartialEq, Eq)]
pub enum DecryptOutcome {
    Plaintext(String),
    /// The active context id is not provisioned here.
    ContextMissing,
    /// The encryption subsystem is not up yet.
    SubsystemNotReady,
    /// Anything else: bad base64, failed authentication, non-UTF-8 plaintext.
    Malformed(String),
}

impl DecryptOutcome {
    pub fn into_plaintext(self) -> Option<String> {
        match self {
            Self::Plaintext(text) => Some(text),
            _ => None,
        }
    }
}

impl From<EncryptionError> for DecryptOutcome {
    fn from(err: EncryptionError) -> Self {
        match err {
            EncryptionError::ContextNotFound(_) => Self::ContextMissing,
            EncryptionError::NotInitialized => Self::SubsystemNotReady,
            EncryptionError::Failed(cause) => Self::Malformed(cause),
        }
    }
}

impl From<Result<String, EncryptionError>> for DecryptOutcome {
    fn from(result: Result<String, EncryptionError>) -> Self {
        match result {
            Ok(text) => Self::Plaintext(text),
            Err(err) => err.into(),
        }
    }
}

impl std::fmt::Debug for DecryptOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plaintext(_) => f.write_str("Plaintext([REDACTED])"),
            Self::ContextMissing => f.write_str("ContextMissing"),
            Self::SubsystemNotReady => f.write_str("SubsystemNotReady"),
            Self::Malformed(cause) => f.debug_tuple("Malformed").field(cause).finish(),
        }
    }
}

/// Which path produced a decoded parameter's in-memory value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    /// Not an encrypted parameter, or no value stored.
    Plain,
    /// Encrypted parameter read verbatim because no context was active.
    Passthrough,
    /// Encrypted parameter left empty because no context was active and the
    /// missing-context policy withholds values.
    Withheld,
    /// Decrypted by the context provider.
    Modern,
    /// Decrypted by the legacy codec after the context provider rejected it.
    Legacy,
    /// Neither codec could read the stored value; it was dropped.
    Unreadable,
}

impl ValueSource {
    /// True when re-saving would change the stored form of the value.
    pub fn needs_migration(self) -> bool {
        matches!(self, Self::Legacy)
    }
}

#[cfg(test)]
mod tests {
    use paramseal_core::ContextId;

    use super::*;

    #[test]
    fn provider_errors_map_to_outcomes() {
        assert_eq!(
            DecryptOutcome::from(EncryptionError::ContextNotFound(ContextId::from("x"))),
            DecryptOutcome::ContextMissing
        );
        assert_eq!(
            DecryptOutcome::from(EncryptionError::NotInitialized),
            DecryptOutcome::SubsystemNotReady
        );
        assert_eq!(
            DecryptOutcome::from(EncryptionError::Failed("bad tag".into())),
            DecryptOutcome::Malformed("bad tag".into())
        );
    }

    #[test]
    fn debug_redacts_plaintext() {
        let rendered = format!("{:?}", DecryptOutcome::Plaintext("hunter2".into()));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn only_legacy_values_need_migration() {
        assert!(ValueSource::Legacy.needs_migration());
        assert!(!ValueSource::Modern.needs_migration());
        assert!(!ValueSource::Unreadable.needs_migration());
    }
}
