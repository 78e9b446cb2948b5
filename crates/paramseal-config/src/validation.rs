// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.
//!
//! Every check runs; the caller gets the whole list of problems at once.

use std::collections::HashSet;
use std::str::FromStr;

use paramseal_core::KeyAlgorithm;
use secrecy::ExposeSecret;

use crate::diagnostic::ConfigError;
use crate::model::{ContextConfig, ParamSealConfig};

/// Log levels accepted in `logging.level`.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Raw length of a context key.
pub const CONTEXT_KEY_LEN: usize = 32;

pub fn validate_config(config: &ParamSealConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.logging.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "logging.level `{}` must be one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        )));
    }

    if let Some(path) = &config.keystore.path
        && path.trim().is_empty()
    {
        errors.push(ConfigError::validation("keystore.path must not be empty"));
    }

    if KeyAlgorithm::from_str(&config.keystore.algorithm).is_err() {
        errors.push(ConfigError::validation(format!(
            "keystore.algorithm `{}` must be AES-128 or AES-256",
            config.keystore.algorithm
        )));
    }

    if let Some(context) = &config.encryption.context
        && context.trim().is_empty()
    {
        errors.push(ConfigError::validation(
            "encryption.context must not be empty when set",
        ));
    }

    let mut seen = HashSet::new();
    for (i, context) in config.contexts.iter().enumerate() {
        if context.id.trim().is_empty() {
            errors.push(ConfigError::validation(format!(
                "contexts[{i}].id must not be empty"
            )));
        } else if !seen.insert(context.id.trim()) {
            errors.push(ConfigError::validation(format!(
                "duplicate context id `{}` in [[contexts]]",
                context.id
            )));
        }
        validate_context_key(i, context, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_context_key(i: usize, context: &ContextConfig, errors: &mut Vec<ConfigError>) {
    match (&context.key_hex, &context.key_env) {
        (Some(_), Some(_)) => errors.push(ConfigError::validation(format!(
            "contexts[{i}] must set only one of key_hex and key_env"
        ))),
        (None, None) => errors.push(ConfigError::validation(format!(
            "contexts[{i}] needs key_hex or key_env"
        ))),
        (Some(hex_key), None) => {
            if let Err(message) = check_hex_key(hex_key.expose_secret()) {
                errors.push(ConfigError::validation(format!(
                    "contexts[{i}].key_hex {message}"
                )));
            }
        }
        (None, Some(var)) => {
            if var.trim().is_empty() {
                errors.push(ConfigError::validation(format!(
                    "contexts[{i}].key_env must not be empty"
                )));
            }
        }
    }
}

/// Check that `text` is hex for exactly [`CONTEXT_KEY_LEN`] bytes.
///
/// The error message never contains the key itself.
pub fn check_hex_key(text: &str) -> Result<(), String> {
    let bytes = hex::decode(text.trim()).map_err(|_| "is not valid hex".to_string())?;
    if bytes.len() != CONTEXT_KEY_LEN {
        return Err(format!(
            "must decode to {CONTEXT_KEY_LEN} bytes, got {}",
            bytes.len()
        ));
    }
    Ok(())
}
