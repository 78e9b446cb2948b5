// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret acquisition via argument, PARAMSEAL_SECRET or TTY prompt.

use paramseal_core::ParamSealError;
use secrecy::SecretString;

/// Environment variable consulted when no value is given on the command line.
pub const SECRET_ENV_VAR: &str = "PARAMSEAL_SECRET";

/// Resolve a secret value.
///
/// Priority:
/// 1. the explicit argument
/// 2. `PARAMSEAL_SECRET` (for scripts and CI)
/// 3. an interactive prompt via `rpassword`, echo disabled
pub fn read_secret(explicit: Option<String>, prompt: &str) -> Result<SecretString, ParamSealError> {
    if let Some(value) = explicit {
        return Ok(SecretString::from(value));
    }

    if let Ok(value) = std::env::var(SECRET_ENV_VAR)
        && !value.is_empty()
    {
        return Ok(SecretString::from(value));
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        eprint!("{prompt}: ");
        let value = rpassword::read_password()?;
        return Ok(SecretString::from(value));
    }

    Err(ParamSealError::Config(format!(
        "no value provided. Pass it as an argument, set {SECRET_ENV_VAR}, or run interactively."
    )))
}
