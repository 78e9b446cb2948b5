// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property tests for the parameter contract.

use paramseal_param::{EncryptedParameter, ParameterBuilder, ParameterRecord, SealedParameter};
use paramseal_test_utils::TestScope;
use proptest::prelude::*;

fn scope() -> TestScope {
    TestScope::with_active_context("ctx-1").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: encode then decode under the same context returns the value.
    #[test]
    fn modern_round_trip(plaintext in "[ -~]{1,64}") {
        let scope = scope();
        let param = EncryptedParameter::new("token", true).unwrap().with_value(plaintext.clone());
        let decoded = EncryptedParameter::decode(param.encode(&scope), &scope).unwrap();
        prop_assert_eq!(decoded.value(), param.value());
    }

    /// Property: the serialized value never contains the plaintext.
    ///
    /// Only the `value` field is inspected; field names and JSON punctuation
    /// would otherwise match short printable inputs.
    #[test]
    fn sealed_value_never_contains_plaintext(plaintext in "[!-~][ -~]{6,46}[!-~]") {
        let scope = scope();
        let param = EncryptedParameter::new("token", true).unwrap().with_value(plaintext.clone());
        let json = serde_json::to_value(SealedParameter::new(&param, &scope)).unwrap();
        let sealed = json["value"].as_str().unwrap();
        prop_assert!(!sealed.contains(&plaintext), "{} leaked into {}", plaintext, sealed);
    }

    /// Property: field order in the incoming record does not change the result.
    #[test]
    fn field_order_is_irrelevant(plaintext in "[ -~]{1,32}", legacy in any::<bool>()) {
        let scope = scope();
        let stored = if legacy {
            paramseal_legacy::encrypt_with_user_key(plaintext.trim(), scope.keys()).unwrap()
        } else {
            EncryptedParameter::new("token", true)
                .unwrap()
                .with_value(plaintext.clone())
                .encode(&scope)
                .value
                .unwrap_or_default()
        };

        let value_first = ParameterBuilder::new()
            .value(stored.clone())
            .encrypted(true)
            .name("token")
            .finish(&scope)
            .unwrap();
        let flag_first = ParameterBuilder::new()
            .encrypted(true)
            .name("token")
            .value(stored.clone())
            .finish(&scope)
            .unwrap();
        prop_assert_eq!(&value_first, &flag_first);

        // The repair path on a value assigned before the flag agrees too.
        let mut repaired = EncryptedParameter::new("token", false).unwrap();
        repaired.set_value(Some(stored));
        repaired.set_encrypted(true, &scope);
        repaired.set_encrypted(true, &scope);
        prop_assert_eq!(repaired.value(), value_first.value());
    }

    /// Property: any stored text under an unknown context decodes to nothing.
    #[test]
    fn unknown_context_never_yields_a_value(stored in "[ -~]{0,64}") {
        let scope = scope();
        let record = ParameterRecord {
            name: "token".into(),
            value: Some(stored),
            encrypted: true,
            enabled: true,
        };
        let decoded = EncryptedParameter::decode(record, &scope.for_context("ctx-2")).unwrap();
        prop_assert_eq!(decoded.value(), None);
    }
}
