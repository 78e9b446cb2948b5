// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for paramseal.
//!
//! TOML files merged in XDG order, `PARAMSEAL_*` environment overrides,
//! strict unknown-key rejection, and miette diagnostics with typo hints.
//!
//! ```no_run
//! let config = paramseal_config::load_and_validate().expect("config errors");
//! println!("missing-context policy: {:?}", config.encryption.on_missing_context);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{MissingContextPolicy, ParamSealConfig};
pub use validation::CONTEXT_KEY_LEN;

/// Load from every layer, then validate.
pub fn load_and_validate() -> Result<ParamSealConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load defaults plus one file (and env overrides), then validate.
pub fn load_and_validate_path(
    path: &std::path::Path,
) -> Result<ParamSealConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        std::fs::read_to_string(path)
            .map(|content| vec![(path.display().to_string(), content)])
            .unwrap_or_default()
    })
}

/// Load defaults plus an inline TOML string, then validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<ParamSealConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

fn finish(
    loaded: Result<ParamSealConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<ParamSealConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            warn_on_plaintext_passthrough(&config);
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Encrypted parameters are written in clear when no context is active and
/// the policy is `passthrough`. Say so once at startup.
fn warn_on_plaintext_passthrough(config: &ParamSealConfig) {
    if config.encryption.context.is_none()
        && config.encryption.on_missing_context == MissingContextPolicy::Passthrough
    {
        tracing::warn!(
            "no encryption.context configured and on_missing_context = \"passthrough\": \
             encrypted parameters will be stored as plaintext"
        );
    }
}

/// Contents of every config file that exists, for error span lookup.
fn collect_toml_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|d| d.join(loader::LOCAL_CONFIG_FILE))
        .ok();

    [
        local,
        loader::user_config_path(),
        Some(std::path::PathBuf::from(loader::SYSTEM_CONFIG_PATH)),
    ]
    .into_iter()
    .flatten()
    .filter_map(|path| {
        std::fs::read_to_string(&path)
            .ok()
            .map(|content| (path.display().to_string(), content))
    })
    .collect()
}
