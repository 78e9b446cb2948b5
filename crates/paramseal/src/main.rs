// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! paramseal - encrypt, decrypt and migrate secret configuration parameters.

mod codec;
mod keygen;
mod legacy;
mod migrate;
mod secret_input;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use paramseal_config::ParamSealConfig;
use paramseal_core::ParamSealError;

/// paramseal - encrypted configuration parameters.
#[derive(Parser, Debug)]
#[command(name = "paramseal", version, about, long_about = None)]
struct Cli {
    /// Config file to load instead of the standard search path.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Encryption context to use, overriding `encryption.context`.
    #[arg(long, global = true)]
    context: Option<String>,

    /// Do not write generated user keys to disk.
    #[arg(long, global = true)]
    no_persist: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the user key if missing, or print a new context key.
    Keygen {
        /// Print a random 256-bit context key as hex for `[[contexts]]`.
        #[arg(long)]
        context_key: bool,
    },
    /// Use the legacy cipher directly.
    Legacy {
        #[command(subcommand)]
        action: LegacyAction,
    },
    /// Encode one parameter and print its JSON record.
    Encode {
        /// Parameter name.
        name: String,
        /// Value to store. Prompted for (or read from PARAMSEAL_SECRET) if omitted.
        #[arg(long)]
        value: Option<String>,
        /// Store the value unencrypted.
        #[arg(long)]
        plain: bool,
    },
    /// Decode parameter records (one object or an array) and print the values.
    Decode {
        /// JSON file to read; stdin when omitted.
        input: Option<PathBuf>,
    },
    /// Rewrite legacy-encrypted values in a parameter file under the active context.
    Migrate {
        /// JSON file holding an array of parameter records.
        file: PathBuf,
        /// Report what would change without writing the file.
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand, Debug)]
enum LegacyAction {
    /// Encrypt text with the user key.
    Encrypt {
        /// Plaintext. Prompted for (or read from PARAMSEAL_SECRET) if omitted.
        text: Option<String>,
    },
    /// Decrypt legacy ciphertext with the user key.
    Decrypt { ciphertext: String },
}

fn main() {
    let cli = Cli::parse();

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            paramseal_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    apply_overrides(&mut config, cli.context.as_deref(), cli.no_persist);

    init_tracing(&config.logging.level);

    if let Err(e) = run(cli.command, &config) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(command: Commands, config: &ParamSealConfig) -> Result<(), ParamSealError> {
    match command {
        Commands::Keygen { context_key } => keygen::run_keygen(config, context_key),
        Commands::Legacy { action } => match action {
            LegacyAction::Encrypt { text } => legacy::run_encrypt(config, text),
            LegacyAction::Decrypt { ciphertext } => legacy::run_decrypt(config, &ciphertext),
        },
        Commands::Encode { name, value, plain } => codec::run_encode(config, &name, value, plain),
        Commands::Decode { input } => codec::run_decode(config, input.as_deref()),
        Commands::Migrate { file, dry_run } => migrate::run_migrate(config, &file, dry_run),
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<ParamSealConfig, Vec<paramseal_config::ConfigError>> {
    match path {
        Some(path) => paramseal_config::load_and_validate_path(path),
        None => paramseal_config::load_and_validate(),
    }
}

/// Command-line flags win over every config layer.
fn apply_overrides(config: &mut ParamSealConfig, context: Option<&str>, no_persist: bool) {
    if let Some(context) = context {
        config.encryption.context = Some(context.to_string());
    }
    if no_persist {
        config.keystore.persist = false;
    }
}

/// Logs go to stderr; stdout carries command output.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("paramseal={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "paramseal",
            "encode",
            "token",
            "--value",
            "ab",
            "--context",
            "ctx-1",
            "--no-persist",
        ])
        .unwrap();
        assert_eq!(cli.context.as_deref(), Some("ctx-1"));
        assert!(cli.no_persist);
        assert!(matches!(cli.command, Commands::Encode { plain: false, .. }));
    }

    #[test]
    fn overrides_replace_config_values() {
        let mut config = ParamSealConfig::default();
        apply_overrides(&mut config, Some("ctx-7"), true);
        assert_eq!(config.encryption.context.as_deref(), Some("ctx-7"));
        assert!(!config.keystore.persist);
    }

    #[test]
    fn no_overrides_leave_config_alone() {
        let mut config = ParamSealConfig::default();
        apply_overrides(&mut config, None, false);
        assert_eq!(config.encryption.context, None);
        assert!(config.keystore.persist);
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paramseal.toml");
        std::fs::write(&path, "[encryption]\ncontext = \"ctx-1\"\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.encryption.context.as_deref(), Some("ctx-1"));
    }

    #[test]
    fn bad_config_file_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paramseal.toml");
        std::fs::write(&path, "[keystore]\npersit = false\n").unwrap();
        let errors = load_config(Some(&path)).unwrap_err();
        assert!(!errors.is_empty());
    }
}
