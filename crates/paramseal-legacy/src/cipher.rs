// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw AES/ECB/PKCS#7 block encryption used by the legacy format.
//!
//! ECB with no IV is what earlier releases wrote; it is kept only so that
//! stored values stay readable. New values go through the context-scoped
//! provider instead.

use aes::{Aes128, Aes256};
use ecb::cipher::block_padding::Pkcs7;
use ecb::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit};
use paramseal_core::{CipherError, Key, KeyAlgorithm};

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Encrypt `plaintext` under `key`, padding to a whole number of blocks.
pub fn encrypt_bytes(key: &Key, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
    let ciphertext = match key.algorithm() {
        KeyAlgorithm::Aes128 => ecb::Encryptor::<Aes128>::new_from_slice(key.as_bytes())
            .map_err(|_| bad_key(key))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        KeyAlgorithm::Aes256 => ecb::Encryptor::<Aes256>::new_from_slice(key.as_bytes())
            .map_err(|_| bad_key(key))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
    };
    Ok(ciphertext)
}

/// Decrypt `ciphertext` under `key` and strip the padding.
pub fn decrypt_bytes(key: &Key, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CipherError::new(format!(
            "ciphertext length {} is not a positive multiple of the block size",
            ciphertext.len()
        )));
    }

    let plaintext = match key.algorithm() {
        KeyAlgorithm::Aes128 => ecb::Decryptor::<Aes128>::new_from_slice(key.as_bytes())
            .map_err(|_| bad_key(key))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        KeyAlgorithm::Aes256 => ecb::Decryptor::<Aes256>::new_from_slice(key.as_bytes())
            .map_err(|_| bad_key(key))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
    };

    plaintext.map_err(|_| CipherError::new("bad padding -- wrong key or corrupted ciphertext"))
}

fn bad_key(key: &Key) -> CipherError {
    CipherError::new(format!(
        "invalid {} key of {} bytes",
        key.algorithm(),
        key.as_bytes().len()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key128() -> Key {
        Key::new(KeyAlgorithm::Aes128, (0u8..16).collect()).unwrap()
    }

    #[test]
    fn round_trip_aes128() {
        let key = key128();
        let ciphertext = encrypt_bytes(&key, b"jdbc-password").unwrap();
        assert_eq!(decrypt_bytes(&key, &ciphertext).unwrap(), b"jdbc-password");
    }

    #[test]
    fn round_trip_aes256() {
        let key = Key::new(KeyAlgorithm::Aes256, vec![3u8; 32]).unwrap();
        let ciphertext = encrypt_bytes(&key, b"x").unwrap();
        assert_eq!(decrypt_bytes(&key, &ciphertext).unwrap(), b"x");
    }

    #[test]
    fn output_is_whole_blocks() {
        let key = key128();
        assert_eq!(encrypt_bytes(&key, b"").unwrap().len(), 16);
        assert_eq!(encrypt_bytes(&key, &[0u8; 15]).unwrap().len(), 16);
        assert_eq!(encrypt_bytes(&key, &[0u8; 16]).unwrap().len(), 32);
    }

    #[test]
    fn matches_known_aes128_ecb_vector() {
        // FIPS-197 appendix C.1 plaintext block, followed by one padding block.
        let key = Key::new(
            KeyAlgorithm::Aes128,
            vec![
                0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c,
                0x0d, 0x0e, 0x0f,
            ],
        )
        .unwrap();
        let plaintext = [
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ];
        let ciphertext = encrypt_bytes(&key, &plaintext).unwrap();
        assert_eq!(
            &ciphertext[..16],
            &[
                0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4,
                0xc5, 0x5a
            ]
        );
    }

    #[test]
    fn partial_block_is_rejected() {
        let err = decrypt_bytes(&key128(), &[0u8; 15]).unwrap_err();
        assert!(err.cause.contains("block size"));
    }

    #[test]
    fn empty_ciphertext_is_rejected() {
        assert!(decrypt_bytes(&key128(), &[]).is_err());
    }

    #[test]
    fn wrong_key_fails_or_garbles() {
        let ciphertext = encrypt_bytes(&key128(), b"secret").unwrap();
        let other = Key::new(KeyAlgorithm::Aes128, vec![0xFF; 16]).unwrap();
        // Without authentication a wrong key is only caught by padding checks.
        match decrypt_bytes(&other, &ciphertext) {
            Ok(garbled) => assert_ne!(garbled, b"secret"),
            Err(err) => assert!(err.cause.contains("padding")),
        }
    }
}
