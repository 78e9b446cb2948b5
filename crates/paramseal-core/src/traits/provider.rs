// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context-scoped symmetric encryption provider.

use crate::error::EncryptionError;
use crate::types::ContextId;

/// Symmetric encryption bound to one encryption context.
pub trait ContextEncryptionProvider: Send + Sync {
    /// Encrypts raw bytes. Output is the provider's binary wire form.
    fn encrypt_string(&self, plaintext: &[u8]) -> Result<Vec<u8>, EncryptionError>;

    /// Decrypts bytes produced by [`encrypt_string`](Self::encrypt_string).
    fn decrypt_string(&self, ciphertext: &[u8]) -> Result<Vec<u8>, EncryptionError>;

    /// Textual encoding of the binary wire form.
    fn encode_to_base64(&self, bytes: &[u8]) -> String;

    /// Inverse of [`encode_to_base64`](Self::encode_to_base64).
    fn decode_from_base64(&self, text: &str) -> Result<Vec<u8>, EncryptionError>;
}

/// Constructs providers for a context id.
///
/// Construction fails with [`EncryptionError::ContextNotFound`] or
/// [`EncryptionError::NotInitialized`]; the parameter contract treats those
/// two differently from every other failure.
pub trait EncryptionProviderFactory: Send + Sync {
    fn provider_for(
        &self,
        context: &ContextId,
    ) -> Result<Box<dyn ContextEncryptionProvider>, EncryptionError>;
}
