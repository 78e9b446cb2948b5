// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `paramseal encode` and `paramseal decode` command implementations.

use std::io::Read;
use std::path::Path;

use paramseal_config::ParamSealConfig;
use paramseal_core::ParamSealError;
use paramseal_param::{EncryptedParameter, ExecutionScope, ParameterRecord, ValueSource};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::secret_input::read_secret;

/// Encode one parameter and print its record as JSON.
pub fn run_encode(
    config: &ParamSealConfig,
    name: &str,
    value: Option<String>,
    plain: bool,
) -> Result<(), ParamSealError> {
    let scope = ExecutionScope::from_config(config)?;
    let value = read_secret(value, "Value")?;
    let record = encode(&scope, name, value.expose_secret(), !plain)?;
    println!("{}", serde_json::to_string_pretty(&record).map_err(to_param_error)?);
    Ok(())
}

/// Decode a record or an array of records and print name, value and source.
pub fn run_decode(config: &ParamSealConfig, input: Option<&Path>) -> Result<(), ParamSealError> {
    let scope = ExecutionScope::from_config(config)?;
    let json = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let decoded = decode(&scope, &json)?;
    println!("{}", serde_json::to_string_pretty(&decoded).map_err(to_param_error)?);
    Ok(())
}

fn encode(
    scope: &ExecutionScope,
    name: &str,
    value: &str,
    encrypted: bool,
) -> Result<ParameterRecord, ParamSealError> {
    let parameter = EncryptedParameter::new(name, encrypted)?.with_value(value);
    if encrypted && scope.current_context().is_none() {
        warn!(
            parameter = %parameter.name(),
            policy = ?scope.missing_context_policy(),
            "no encryption context; pass --context or set encryption.context"
        );
    }
    Ok(parameter.encode(scope))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordInput {
    One(ParameterRecord),
    Many(Vec<ParameterRecord>),
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct DecodedValue {
    name: String,
    value: Option<String>,
    source: ValueSource,
}

fn decode(scope: &ExecutionScope, json: &str) -> Result<Vec<DecodedValue>, ParamSealError> {
    let records = match serde_json::from_str(json).map_err(to_param_error)? {
        RecordInput::One(record) => vec![record],
        RecordInput::Many(records) => records,
    };
    records
        .into_iter()
        .map(|record| -> Result<DecodedValue, ParamSealError> {
            let (parameter, source) = EncryptedParameter::decode_with_source(record, scope)?;
            Ok(DecodedValue {
                name: parameter.name().to_string(),
                value: parameter.value().map(str::to_string),
                source,
            })
        })
        .collect()
}

fn to_param_error(err: serde_json::Error) -> ParamSealError {
    ParamSealError::Parameter(err.into())
}

#[cfg(test)]
mod tests {
    use paramseal_config::model::ContextConfig;
    use secrecy::SecretString;

    use super::*;

    const KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    fn scope(dir: &Path, context: Option<&str>) -> ExecutionScope {
        let mut config = ParamSealConfig::default();
        config.keystore.path = Some(dir.join("user.key").display().to_string());
        config.encryption.context = context.map(str::to_string);
        config.contexts = vec![ContextConfig {
            id: "ctx-1".to_string(),
            key_hex: Some(SecretString::from(KEY_HEX.to_string())),
            key_env: None,
        }];
        ExecutionScope::from_config(&config).unwrap()
    }

    #[test]
    fn encode_then_decode_under_configured_context() {
        let dir = tempfile::tempdir().unwrap();
        let scope = scope(dir.path(), Some("ctx-1"));

        let record = encode(&scope, "token", "ab", true).unwrap();
        assert_ne!(record.value.as_deref(), Some("ab"));

        let json = serde_json::to_string(&record).unwrap();
        let decoded = decode(&scope, &json).unwrap();
        assert_eq!(
            decoded,
            vec![DecodedValue {
                name: "token".into(),
                value: Some("ab".into()),
                source: ValueSource::Modern,
            }]
        );
    }

    #[test]
    fn decode_accepts_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let scope = scope(dir.path(), Some("ctx-1"));
        let json = r#"[{"name":"url","value":"http://x"},{"name":"empty"}]"#;

        let decoded = decode(&scope, json).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].value.as_deref(), Some("http://x"));
        assert_eq!(decoded[1].value, None);
    }

    #[test]
    fn decode_under_other_context_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let record = encode(&scope(dir.path(), Some("ctx-1")), "token", "ab", true).unwrap();
        let json = serde_json::to_string(&record).unwrap();

        let decoded = decode(&scope(dir.path(), Some("ctx-2")), &json).unwrap();
        assert_eq!(decoded[0].value, None);
        assert_eq!(decoded[0].source, ValueSource::Unreadable);
    }

    #[test]
    fn plain_flag_stores_value_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let record = encode(&scope(dir.path(), Some("ctx-1")), "url", "http://x", false).unwrap();
        assert_eq!(record.value.as_deref(), Some("http://x"));
        assert!(!record.encrypted);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(decode(&scope(dir.path(), None), "not json").is_err());
    }
}
