// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is an
//! error at startup instead of a silently ignored setting.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Top-level paramseal configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ParamSealConfig {
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Where the legacy user key lives.
    #[serde(default)]
    pub keystore: KeyStoreConfig,

    /// Context-scoped encryption behaviour.
    #[serde(default)]
    pub encryption: EncryptionConfig,

    /// Keys backing each encryption context.
    #[serde(default)]
    pub contexts: Vec<ContextConfig>,
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// User key storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeyStoreConfig {
    /// Key file path. `None` uses `<data_dir>/paramseal/keys/v1/user.key`.
    #[serde(default)]
    pub path: Option<String>,

    /// Persist generated keys. `false` keeps them in memory for the run.
    #[serde(default = "default_persist")]
    pub persist: bool,

    /// Algorithm for newly generated keys (`AES-128` or `AES-256`).
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

impl Default for KeyStoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            persist: default_persist(),
            algorithm: default_algorithm(),
        }
    }
}

fn default_persist() -> bool {
    true
}

fn default_algorithm() -> String {
    "AES-128".to_string()
}

/// What an `encrypted` parameter does when no encryption context resolves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingContextPolicy {
    /// Write and read the value as plaintext.
    ///
    /// Lets offline and test runs work without a provisioned encryption
    /// service, at the cost of persisting secrets unencrypted.
    #[default]
    Passthrough,

    /// Write `null` and read nothing; the secret is never stored in clear.
    Withhold,
}

/// Context-scoped encryption configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EncryptionConfig {
    /// Behaviour when no encryption context is active.
    #[serde(default)]
    pub on_missing_context: MissingContextPolicy,

    /// Whether the context key ring is ready at startup.
    #[serde(default = "default_initialized")]
    pub initialized: bool,

    /// Context used when the caller does not name one.
    #[serde(default)]
    pub context: Option<String>,
}

impl Default for EncryptionConfig {
    fn default() -> Self {
        Self {
            on_missing_context: MissingContextPolicy::default(),
            initialized: default_initialized(),
            context: None,
        }
    }
}

fn default_initialized() -> bool {
    true
}

/// One encryption context and the source of its 256-bit key.
///
/// Exactly one of `key_hex` and `key_env` must be set.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContextConfig {
    /// Context identifier.
    pub id: String,

    /// Key as 64 hex characters.
    #[serde(default, skip_serializing)]
    pub key_hex: Option<SecretString>,

    /// Name of an environment variable holding the key as hex.
    #[serde(default)]
    pub key_env: Option<String>,
}
