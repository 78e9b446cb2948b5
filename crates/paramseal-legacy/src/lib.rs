// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Legacy cipher codec.
//!
//! Reads and writes parameter values in the format used before context-scoped
//! encryption existed: AES/ECB/PKCS#7 under the installation's user key,
//! encoded as Base64 with a sentinel-flagged variant for short plaintexts
//! (see [`encoding`]).
//!
//! All failures are a single [`CipherError`]; none are worth retrying.

pub mod cipher;
pub mod encoding;

use paramseal_core::{CipherError, Key, ParamSealError};
use paramseal_keys::KeyManager;
use tracing::debug;

pub use encoding::{SHORT_PLAINTEXT_CHARS, SHORT_SENTINEL, TextEncoding};

/// Encrypt `text` under `key` and encode it in the legacy textual form.
pub fn encrypt(text: &str, key: &Key) -> Result<String, CipherError> {
    let encoding = TextEncoding::for_plaintext(text);
    let ciphertext = cipher::encrypt_bytes(key, text.as_bytes())?;
    debug!(?encoding, "legacy value encrypted");
    Ok(encoding::encode(&ciphertext, encoding))
}

/// Decode and decrypt a legacy ciphertext string.
pub fn decrypt(encoded: &str, key: &Key) -> Result<String, CipherError> {
    let ciphertext = encoding::decode(encoded)?;
    let plaintext = cipher::decrypt_bytes(key, &ciphertext)?;
    String::from_utf8(plaintext)
        .map_err(|_| CipherError::new("decrypted value is not valid UTF-8"))
}

/// [`encrypt`] with the scope's current user key.
///
/// Fails with [`ParamSealError::Key`] when the scope has no key.
pub fn encrypt_with_user_key(text: &str, keys: &KeyManager) -> Result<String, ParamSealError> {
    let key = keys.user_key()?;
    Ok(encrypt(text, &key)?)
}

/// [`decrypt`] with the scope's current user key.
pub fn decrypt_with_user_key(encoded: &str, keys: &KeyManager) -> Result<String, ParamSealError> {
    let key = keys.user_key()?;
    Ok(decrypt(encoded, &key)?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use paramseal_core::{KeyAlgorithm, KeyError};
    use paramseal_keys::{MemoryKeyStore, generate_key};

    fn key() -> Key {
        Key::new(KeyAlgorithm::Aes128, b"0123456789abcdef".to_vec()).unwrap()
    }

    #[test]
    fn long_value_round_trip_uses_standard_encoding() {
        let encoded = encrypt("hunter22", &key()).unwrap();
        assert!(!encoded.ends_with(SHORT_SENTINEL));
        assert_eq!(decrypt(&encoded, &key()).unwrap(), "hunter22");
    }

    #[test]
    fn short_value_round_trip_uses_sentinel() {
        for text in ["", "a", "ab", "abc"] {
            let encoded = encrypt(text, &key()).unwrap();
            assert!(encoded.ends_with(SHORT_SENTINEL), "{text:?} -> {encoded}");
            assert_eq!(decrypt(&encoded, &key()).unwrap(), text);
        }
    }

    #[test]
    fn encryption_is_deterministic() {
        // ECB without IV: same key and plaintext always give the same text.
        assert_eq!(
            encrypt("password", &key()).unwrap(),
            encrypt("password", &key()).unwrap()
        );
    }

    #[test]
    fn malformed_input_is_a_cipher_failure() {
        assert!(decrypt("%%%", &key()).is_err());
        // Valid base64, wrong length.
        assert!(decrypt("AAAA", &key()).is_err());
    }

    #[test]
    fn convenience_calls_use_scope_key() {
        let keys = KeyManager::new(Arc::new(MemoryKeyStore::new()));
        keys.set_user_key(generate_key(KeyAlgorithm::Aes128).unwrap());

        let encoded = encrypt_with_user_key("ab", &keys).unwrap();
        assert_eq!(decrypt_with_user_key(&encoded, &keys).unwrap(), "ab");
    }

    #[test]
    fn convenience_calls_without_key_report_unavailable() {
        let keys = KeyManager::new(Arc::new(MemoryKeyStore::new()));
        let err = encrypt_with_user_key("secret", &keys).unwrap_err();
        assert!(matches!(err, ParamSealError::Key(KeyError::Unavailable)));
    }
}
