// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parameter sets stored as a JSON array of records, and legacy migration.

use serde::Serialize;
use tracing::info;

use paramseal_core::ParameterError;

use crate::outcome::ValueSource;
use crate::parameter::{EncryptedParameter, ParameterRecord};
use crate::scope::ExecutionScope;

/// Encode every parameter to a pretty-printed JSON array.
pub fn to_json(
    parameters: &[EncryptedParameter],
    scope: &ExecutionScope,
) -> Result<String, ParameterError> {
    let records: Vec<ParameterRecord> = parameters.iter().map(|p| p.encode(scope)).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Decode a JSON array of records.
///
/// Values that cannot be decrypted come back empty; only structural problems
/// (bad JSON, missing or blank names) are errors.
pub fn from_json(
    json: &str,
    scope: &ExecutionScope,
) -> Result<Vec<EncryptedParameter>, ParameterError> {
    let records: Vec<ParameterRecord> = serde_json::from_str(json)?;
    records
        .into_iter()
        .map(|record| EncryptedParameter::decode(record, scope))
        .collect()
}

/// What a migration pass did, by parameter name.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Legacy ciphertext rewritten under the active context.
    pub migrated: Vec<String>,
    /// Already current, not encrypted, or not readable without a context.
    pub unchanged: Vec<String>,
    /// Could not be read; the stored value was kept as-is.
    pub unreadable: Vec<String>,
}

impl MigrationReport {
    pub fn is_clean(&self) -> bool {
        self.unreadable.is_empty()
    }
}

/// Rewrite legacy-encrypted values under the scope's active context.
///
/// Records are otherwise returned untouched: modern ciphertext is not
/// re-sealed, and a value neither codec can read is kept so no data is lost.
pub fn migrate_records(
    records: Vec<ParameterRecord>,
    scope: &ExecutionScope,
) -> Result<(Vec<ParameterRecord>, MigrationReport), ParameterError> {
    let mut report = MigrationReport::default();
    let mut out = Vec::with_capacity(records.len());

    for record in records {
        let (rewritten, source) = EncryptedParameter::reencode(record.clone(), scope)?;
        let name = rewritten.name.clone();
        match source {
            ValueSource::Legacy if rewritten.value.is_some() => {
                report.migrated.push(name);
                out.push(rewritten);
            }
            ValueSource::Legacy | ValueSource::Unreadable => {
                report.unreadable.push(name);
                out.push(record);
            }
            ValueSource::Plain
            | ValueSource::Passthrough
            | ValueSource::Withheld
            | ValueSource::Modern => {
                report.unchanged.push(name);
                out.push(record);
            }
        }
    }

    info!(
        migrated = report.migrated.len(),
        unchanged = report.unchanged.len(),
        unreadable = report.unreadable.len(),
        "parameter migration finished"
    );
    Ok((out, report))
}

/// [`migrate_records`] over a JSON array.
pub fn migrate_json(
    json: &str,
    scope: &ExecutionScope,
) -> Result<(String, MigrationReport), ParameterError> {
    let records: Vec<ParameterRecord> = serde_json::from_str(json)?;
    let (records, report) = migrate_records(records, scope)?;
    Ok((serde_json::to_string_pretty(&records)?, report))
}
