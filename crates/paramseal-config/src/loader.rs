// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Later layers override earlier ones:
//! 1. compiled defaults
//! 2. `/etc/paramseal/paramseal.toml`
//! 3. `~/.config/paramseal/paramseal.toml`
//! 4. `./paramseal.toml`
//! 5. `PARAMSEAL_*` environment variables

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ParamSealConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/paramseal/paramseal.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "paramseal.toml";

/// Per-user config file under the XDG config directory, if one exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("paramseal").join(LOCAL_CONFIG_FILE))
}

/// The full layered Figment, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ParamSealConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Load configuration from every layer.
pub fn load_config() -> Result<ParamSealConfig, figment::Error> {
    build_figment().extract()
}

/// Load defaults plus one explicit file, with env overrides.
pub fn load_config_from_path(path: &Path) -> Result<ParamSealConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ParamSealConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Load defaults plus an inline TOML string. No env overrides.
pub fn load_config_from_str(toml_content: &str) -> Result<ParamSealConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ParamSealConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Sections that can be overridden from the environment.
const ENV_SECTIONS: &[&str] = &["logging", "keystore", "encryption"];

/// `PARAMSEAL_<SECTION>_<KEY>` to `section.key`.
///
/// Mapped per section rather than with `Env::split("_")` because keys such as
/// `on_missing_context` contain underscores themselves. Other `PARAMSEAL_*`
/// variables (for example `PARAMSEAL_SECRET`) are not config and are skipped.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("PARAMSEAL_")
        .filter(|key| env_section(key.as_str()).is_some())
        .map(|key| match env_section(key.as_str()) {
            Some(section) => {
                let field = &key.as_str()[section.len() + 1..];
                format!("{section}.{}", field.to_ascii_lowercase()).into()
            }
            None => key.as_str().to_string().into(),
        })
}

fn env_section(key: &str) -> Option<&'static str> {
    ENV_SECTIONS.iter().copied().find(|section| {
        key.len() > section.len() + 1
            && key[..section.len()].eq_ignore_ascii_case(section)
            && key.as_bytes()[section.len()] == b'_'
    })
}
