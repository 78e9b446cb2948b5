// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM provider for one encryption context.
//!
//! Wire form is `nonce (12 bytes) || ciphertext || tag (16 bytes)`, encoded as
//! standard Base64. The context id is bound in as associated data, so a value
//! sealed under one context never opens under another even if two contexts
//! were provisioned with the same key.
//!
//! Every seal draws a fresh 96-bit nonce from the system CSPRNG.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use paramseal_core::{ContextEncryptionProvider, ContextId, EncryptionError};
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};

pub use paramseal_config::CONTEXT_KEY_LEN;

/// GCM authentication tag length.
pub const TAG_LEN: usize = 16;

pub struct AesGcmProvider {
    context: ContextId,
    key: LessSafeKey,
    rng: SystemRandom,
}

impl AesGcmProvider {
    pub fn new(context: ContextId, key: &[u8; CONTEXT_KEY_LEN]) -> Result<Self, EncryptionError> {
        let unbound = UnboundKey::new(&AES_256_GCM, key)
            .map_err(|_| EncryptionError::Failed("failed to create AES-256-GCM key".to_string()))?;
        Ok(Self {
            context,
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    pub fn context(&self) -> &ContextId {
        &self.context
    }

    fn aad(&self) -> Aad<&[u8]> {
        Aad::from(self.context.as_str().as_bytes())
    }
}

impl std::fmt::Debug for AesGcmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcmProvider")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl ContextEncryptionProvider for AesGcmProvider {
    fn encrypt_string(&self, plaintext: &[u8]) -> Result<Vec<u8>, EncryptionError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| EncryptionError::Failed("failed to generate random nonce".to_string()))?;
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        let mut in_out = plaintext.to_vec();
        self.key
            .seal_in_place_append_tag(nonce, self.aad(), &mut in_out)
            .map_err(|_| EncryptionError::Failed("AES-256-GCM encryption failed".to_string()))?;

        let mut wire = Vec::with_capacity(NONCE_LEN + in_out.len());
        wire.extend_from_slice(&nonce_bytes);
        wire.extend_from_slice(&in_out);
        Ok(wire)
    }

    fn decrypt_string(&self, ciphertext: &[u8]) -> Result<Vec<u8>, EncryptionError> {
        if ciphertext.len() < NONCE_LEN + TAG_LEN {
            return Err(EncryptionError::Failed(format!(
                "ciphertext too short: {} bytes",
                ciphertext.len()
            )));
        }
        let (nonce_bytes, sealed) = ciphertext.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| EncryptionError::Failed("invalid nonce".to_string()))?;

        let mut in_out = sealed.to_vec();
        let plaintext = self
            .key
            .open_in_place(nonce, self.aad(), &mut in_out)
            .map_err(|_| {
                EncryptionError::Failed(
                    "AES-256-GCM decryption failed -- wrong key, wrong context or corrupted data"
                        .to_string(),
                )
            })?;
        Ok(plaintext.to_vec())
    }

    fn encode_to_base64(&self, bytes: &[u8]) -> String {
        STANDARD.encode(bytes)
    }

    fn decode_from_base64(&self, text: &str) -> Result<Vec<u8>, EncryptionError> {
        STANDARD
            .decode(text)
            .map_err(|_| EncryptionError::Failed("value is not valid base64".to_string()))
    }
}

/// Generate a random key suitable for a context.
pub fn generate_context_key() -> Result<[u8; CONTEXT_KEY_LEN], EncryptionError> {
    let mut key = [0u8; CONTEXT_KEY_LEN];
    SystemRandom::new()
        .fill(&mut key)
        .map_err(|_| EncryptionError::Failed("failed to generate random key".to_string()))?;
    Ok(key)
}
