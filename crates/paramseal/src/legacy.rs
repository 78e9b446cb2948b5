// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `paramseal legacy encrypt|decrypt` command implementations.

use paramseal_config::ParamSealConfig;
use paramseal_core::ParamSealError;
use paramseal_param::ExecutionScope;
use secrecy::ExposeSecret;

use crate::secret_input::read_secret;

/// Encrypt with the user key, creating the key on first use.
pub fn run_encrypt(config: &ParamSealConfig, text: Option<String>) -> Result<(), ParamSealError> {
    let scope = ExecutionScope::from_config(config)?;
    let text = read_secret(text, "Plaintext")?;
    println!("{}", encrypt(&scope, text.expose_secret())?);
    Ok(())
}

/// Decrypt with the existing user key. Never creates one.
pub fn run_decrypt(config: &ParamSealConfig, ciphertext: &str) -> Result<(), ParamSealError> {
    let scope = ExecutionScope::from_config(config)?;
    println!("{}", decrypt(&scope, ciphertext)?);
    Ok(())
}

fn encrypt(scope: &ExecutionScope, text: &str) -> Result<String, ParamSealError> {
    let key = scope.keys().user_key_or_create()?;
    Ok(paramseal_legacy::encrypt(text, &key)?)
}

fn decrypt(scope: &ExecutionScope, ciphertext: &str) -> Result<String, ParamSealError> {
    paramseal_legacy::decrypt_with_user_key(ciphertext.trim(), scope.keys())
}
