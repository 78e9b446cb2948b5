// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `paramseal keygen` command implementation.

use paramseal_config::ParamSealConfig;
use paramseal_core::ParamSealError;
use paramseal_param::ExecutionScope;
use tracing::info;
use zeroize::Zeroizing;

/// Ensure a user key exists, or print a fresh context key.
///
/// The user key itself is never printed; only where it lives.
pub fn run_keygen(config: &ParamSealConfig, context_key: bool) -> Result<(), ParamSealError> {
    if context_key {
        let key = paramseal_param::generate_context_key()?;
        let hex_key = Zeroizing::new(hex::encode(key));
        println!("{}", hex_key.as_str());
        return Ok(());
    }

    let scope = ExecutionScope::from_config(config)?;
    println!("{}", describe_user_key(&scope)?);
    Ok(())
}

fn describe_user_key(scope: &ExecutionScope) -> Result<String, ParamSealError> {
    let existed = scope.keys().user_key().is_ok();
    let key = scope.keys().user_key_or_create()?;
    let action = if existed { "existing" } else { "created" };
    let stored = if scope.keys().persists() {
        scope.keys().location()
    } else {
        "memory only (--no-persist)".to_string()
    };
    info!(action, algorithm = %key.algorithm(), "user key ready");
    Ok(format!("{action} {} user key at {stored}", key.algorithm()))
}
