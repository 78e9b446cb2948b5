// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Textual encoding of legacy ciphertext.
//!
//! Two encodings coexist in stored data:
//!
//! - plaintexts of [`SHORT_PLAINTEXT_CHARS`] characters or more: standard
//!   padded Base64, which never contains `_`;
//! - shorter plaintexts: URL-safe padded Base64 followed by the
//!   [`SHORT_SENTINEL`] character.
//!
//! The original encoder mishandled short inputs, so values from that case
//! were written with the second form and flagged. Both forms must decode.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use paramseal_core::CipherError;

/// Plaintexts with fewer characters than this use the sentinel encoding.
pub const SHORT_PLAINTEXT_CHARS: usize = 4;

/// Trailing marker of the short-value encoding.
pub const SHORT_SENTINEL: char = '_';

/// Which textual encoding a ciphertext string uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Standard,
    ShortSentinel,
}

impl TextEncoding {
    /// The encoding a plaintext of this length is written with.
    pub fn for_plaintext(plaintext: &str) -> Self {
        if plaintext.chars().count() < SHORT_PLAINTEXT_CHARS {
            Self::ShortSentinel
        } else {
            Self::Standard
        }
    }

    /// The encoding an existing ciphertext string was written with.
    pub fn detect(encoded: &str) -> Self {
        if encoded.ends_with(SHORT_SENTINEL) {
            Self::ShortSentinel
        } else {
            Self::Standard
        }
    }
}

/// Encode raw ciphertext bytes in the given textual form.
pub fn encode(ciphertext: &[u8], encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Standard => STANDARD.encode(ciphertext),
        TextEncoding::ShortSentinel => {
            let mut out = URL_SAFE.encode(ciphertext);
            out.push(SHORT_SENTINEL);
            out
        }
    }
}

/// Decode a ciphertext string, dispatching on the trailing sentinel.
pub fn decode(encoded: &str) -> Result<Vec<u8>, CipherError> {
    match TextEncoding::detect(encoded) {
        TextEncoding::ShortSentinel => {
            let body = encoded.strip_suffix(SHORT_SENTINEL).unwrap_or(encoded);
            URL_SAFE
                .decode(body)
                .map_err(|e| CipherError::new(format!("malformed short-value encoding: {e}")))
        }
        TextEncoding::Standard => STANDARD
            .decode(encoded)
            .map_err(|e| CipherError::new(format!("malformed base64: {e}"))),
    }
}
