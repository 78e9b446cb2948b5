// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `paramseal migrate` command implementation.
//!
//! Reads a JSON array of parameter records, rewrites values still in the
//! legacy cipher format under the active context, and replaces the file
//! atomically. Unreadable values are left exactly as they were.

use std::io::{IsTerminal, Write};
use std::path::Path;

use paramseal_config::ParamSealConfig;
use paramseal_core::ParamSealError;
use paramseal_param::{ExecutionScope, MigrationReport, set};
use tracing::info;

pub fn run_migrate(
    config: &ParamSealConfig,
    file: &Path,
    dry_run: bool,
) -> Result<(), ParamSealError> {
    let scope = ExecutionScope::from_config(config)?;
    let report = migrate_file(&scope, file, dry_run)?;
    print_report(&report, dry_run, std::io::stdout().is_terminal());
    Ok(())
}

fn migrate_file(
    scope: &ExecutionScope,
    file: &Path,
    dry_run: bool,
) -> Result<MigrationReport, ParamSealError> {
    let Some(context) = scope.current_context() else {
        return Err(ParamSealError::Config(
            "migration needs an encryption context; pass --context or set encryption.context"
                .to_string(),
        ));
    };

    let json = std::fs::read_to_string(file)?;
    let (rewritten, report) = set::migrate_json(&json, scope)?;

    if dry_run || report.migrated.is_empty() {
        return Ok(report);
    }

    let dir = file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(rewritten.as_bytes())?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(file).map_err(|e| ParamSealError::Io(e.error))?;

    info!(
        file = %file.display(),
        context = %context,
        migrated = report.migrated.len(),
        "parameter file rewritten"
    );
    Ok(report)
}

fn print_report(report: &MigrationReport, dry_run: bool, use_color: bool) {
    let verb = if dry_run { "would migrate" } else { "migrated" };
    let lines = [
        (verb, &report.migrated),
        ("unchanged", &report.unchanged),
        ("unreadable", &report.unreadable),
    ];
    for (label, names) in lines {
        if names.is_empty() {
            continue;
        }
        let label = if use_color {
            use colored::Colorize;
            match label {
                "unreadable" => label.red().to_string(),
                "unchanged" => label.dimmed().to_string(),
                _ => label.green().to_string(),
            }
        } else {
            label.to_string()
        };
        println!("{label}: {}", names.join(", "));
    }
    if report.migrated.is_empty() && report.unreadable.is_empty() {
        println!("nothing to migrate");
    }
}
