// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serde entry points that carry an [`ExecutionScope`].
//!
//! Encoding and decoding need the scope, so [`EncryptedParameter`] does not
//! implement `Serialize`/`Deserialize` directly. Wrap it in
//! [`SealedParameter`] to serialize, and deserialize through
//! [`ParameterSeed`].

use serde::de::{DeserializeSeed, Deserializer, Error as _};
use serde::{Deserialize, Serialize, Serializer};

use crate::parameter::{EncryptedParameter, ParameterRecord};
use crate::scope::ExecutionScope;

/// Serializes a parameter as its encoded [`ParameterRecord`].
pub struct SealedParameter<'a> {
    parameter: &'a EncryptedParameter,
    scope: &'a ExecutionScope,
}

impl<'a> SealedParameter<'a> {
    pub fn new(parameter: &'a EncryptedParameter, scope: &'a ExecutionScope) -> Self {
        Self { parameter, scope }
    }
}

impl Serialize for SealedParameter<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.parameter.encode(self.scope).serialize(serializer)
    }
}

/// Deserializes a record and decodes it under a scope.
#[derive(Clone, Copy)]
pub struct ParameterSeed<'a> {
    scope: &'a ExecutionScope,
}

impl<'a> ParameterSeed<'a> {
    pub fn new(scope: &'a ExecutionScope) -> Self {
        Self { scope }
    }
}

impl<'de> DeserializeSeed<'de> for ParameterSeed<'_> {
    type Value = EncryptedParameter;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        let record = ParameterRecord::deserialize(deserializer)?;
        EncryptedParameter::decode(record, self.scope).map_err(D::Error::custom)
    }
}
