// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key store providers: a length-prefixed file on disk and an in-memory slot.
//!
//! On-disk format: big-endian `i32` length followed by exactly that many key
//! bytes. A short read is a hard failure, never a partial key.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use paramseal_core::{Key, KeyAlgorithm, KeyError, KeyStoreProvider};
use ring::rand::{SecureRandom, SystemRandom};
use tracing::{debug, info};

/// Version segment of the key path. Bump when the blob format changes.
pub const KEY_FORMAT_VERSION: &str = "v1";

/// File name of the user key inside the versioned directory.
pub const KEY_FILE_NAME: &str = "user.key";

/// Upper bound on the length prefix; anything larger is corruption.
const MAX_KEY_BLOB_LEN: i32 = 1024;

/// Generate a random key for `algorithm` from the system CSPRNG.
pub fn generate_key(algorithm: KeyAlgorithm) -> Result<Key, KeyError> {
    let rng = SystemRandom::new();
    let mut bytes = vec![0u8; algorithm.key_len()];
    rng.fill(&mut bytes)
        .map_err(|_| KeyError::Generation("failed to generate random key".to_string()))?;
    Key::new(algorithm, bytes).map_err(|e| KeyError::Generation(e.to_string()))
}

/// Encode raw key bytes as a length-prefixed blob.
pub fn encode_key_blob(key: &[u8]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(4 + key.len());
    blob.extend_from_slice(&(key.len() as i32).to_be_bytes());
    blob.extend_from_slice(key);
    blob
}

/// Decode a length-prefixed blob back into raw key bytes.
///
/// Bytes past the declared length are ignored.
pub fn decode_key_blob(blob: &[u8]) -> Result<Vec<u8>, KeyError> {
    let Some((prefix, rest)) = blob.split_first_chunk::<4>() else {
        return Err(KeyError::Load(format!(
            "truncated length prefix: {} bytes",
            blob.len()
        )));
    };

    let len = i32::from_be_bytes(*prefix);
    if !(0..=MAX_KEY_BLOB_LEN).contains(&len) {
        return Err(KeyError::Load(format!("invalid key length prefix {len}")));
    }

    let len = len as usize;
    if rest.len() < len {
        return Err(KeyError::Load(format!(
            "short read: expected {len} key bytes, got {}",
            rest.len()
        )));
    }

    Ok(rest[..len].to_vec())
}

/// Key store backed by a single file in the installation's data directory.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    path: PathBuf,
    algorithm: KeyAlgorithm,
}

impl FileKeyStore {
    /// A store at an explicit path, generating AES-128 keys.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            algorithm: KeyAlgorithm::Aes128,
        }
    }

    /// A store at the default versioned location, if a data directory exists.
    pub fn at_default_location() -> Option<Self> {
        default_key_path().map(Self::new)
    }

    /// Use `algorithm` for newly generated keys.
    pub fn with_algorithm(mut self, algorithm: KeyAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `<data_dir>/paramseal/keys/v1/user.key`.
pub fn default_key_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| {
        d.join("paramseal")
            .join("keys")
            .join(KEY_FORMAT_VERSION)
            .join(KEY_FILE_NAME)
    })
}

impl KeyStoreProvider for FileKeyStore {
    fn generate(&self) -> Result<Key, KeyError> {
        generate_key(self.algorithm)
    }

    fn store(&self, key: &Key) -> Result<(), KeyError> {
        let storage_err =
            |e: std::io::Error| KeyError::Storage(format!("{}: {e}", self.path.display()));

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(storage_err)?;
        }
        std::fs::write(&self.path, encode_key_blob(key.as_bytes())).map_err(storage_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(storage_err)?;
        }

        info!(path = %self.path.display(), algorithm = %key.algorithm(), "user key stored");
        Ok(())
    }

    fn load(&self) -> Result<Option<Key>, KeyError> {
        let blob = match std::fs::read(&self.path) {
            Ok(blob) => blob,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored user key");
                return Ok(None);
            }
            Err(e) => {
                return Err(KeyError::Load(format!("{}: {e}", self.path.display())));
            }
        };

        let key = Key::from_bytes(decode_key_blob(&blob)?)?;
        debug!(path = %self.path.display(), algorithm = %key.algorithm(), "user key loaded");
        Ok(Some(key))
    }

    fn is_writable(&self) -> bool {
        // Nearest existing ancestor decides; missing directories get created on store.
        self.path
            .ancestors()
            .skip(1)
            .find_map(|dir| std::fs::metadata(dir).ok())
            .is_some_and(|meta| meta.is_dir() && !meta.permissions().readonly())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Key store that keeps the key in process memory.
///
/// Used by tests and by runs that must not touch disk. `read_only()` makes
/// [`is_writable`](KeyStoreProvider::is_writable) report false.
#[derive(Debug)]
pub struct MemoryKeyStore {
    slot: Mutex<Option<Key>>,
    algorithm: KeyAlgorithm,
    writable: bool,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            algorithm: KeyAlgorithm::Aes128,
            writable: true,
        }
    }

    /// A store that already holds `key`.
    pub fn with_key(key: Key) -> Self {
        let store = Self::new();
        *store.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(key);
        store
    }

    /// Mark the store as not writable.
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    pub fn with_algorithm(mut self, algorithm: KeyAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Whether a key has been stored.
    pub fn is_empty(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl Default for MemoryKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyStoreProvider for MemoryKeyStore {
    fn generate(&self) -> Result<Key, KeyError> {
        generate_key(self.algorithm)
    }

    fn store(&self, key: &Key) -> Result<(), KeyError> {
        if !self.writable {
            return Err(KeyError::Storage("memory key store is read-only".to_string()));
        }
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(key.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<Key>, KeyError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn is_writable(&self) -> bool {
        self.writable
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn generated_keys_are_random_and_sized() {
        let a = generate_key(KeyAlgorithm::Aes128).unwrap();
        let b = generate_key(KeyAlgorithm::Aes128).unwrap();
        assert_eq!(a.as_bytes().len(), 16);
        assert_ne!(a, b);

        let c = generate_key(KeyAlgorithm::Aes256).unwrap();
        assert_eq!(c.as_bytes().len(), 32);
    }

    #[test]
    fn blob_has_big_endian_length_prefix() {
        let blob = encode_key_blob(&[1, 2, 3]);
        assert_eq!(blob, vec![0, 0, 0, 3, 1, 2, 3]);
        assert_eq!(decode_key_blob(&blob).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn short_read_is_a_hard_failure() {
        let mut blob = encode_key_blob(&[7u8; 16]);
        blob.truncate(10);
        let err = decode_key_blob(&blob).unwrap_err();
        assert!(matches!(err, KeyError::Load(ref msg) if msg.contains("short read")));
    }

    #[test]
    fn truncated_prefix_fails() {
        assert!(matches!(decode_key_blob(&[0, 0]), Err(KeyError::Load(_))));
    }

    #[test]
    fn negative_or_oversized_length_fails() {
        let negative = (-1i32).to_be_bytes();
        assert!(decode_key_blob(&negative).is_err());

        let oversized = 4096i32.to_be_bytes();
        assert!(decode_key_blob(&oversized).is_err());
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut blob = encode_key_blob(&[5u8; 16]);
        blob.extend_from_slice(b"junk");
        assert_eq!(decode_key_blob(&blob).unwrap(), vec![5u8; 16]);
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileKeyStore::new(dir.path().join("keys/v1/user.key"));

        assert!(store.load().unwrap().is_none());

        let key = store.generate().unwrap();
        store.store(&key).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, key);
    }

    #[cfg(unix)]
    #[test]
    fn file_store_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let store = FileKeyStore::new(dir.path().join("user.key"));
        store.store(&store.generate().unwrap()).unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn file_store_rejects_corrupt_blob() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("user.key");
        std::fs::write(&path, [0, 0, 0, 16, 1, 2]).unwrap();

        let store = FileKeyStore::new(&path);
        assert!(matches!(store.load(), Err(KeyError::Load(_))));
    }

    #[test]
    fn file_store_in_temp_dir_is_writable() {
        let dir = tempdir().unwrap();
        let store = FileKeyStore::new(dir.path().join("nested/deeper/user.key"));
        assert!(store.is_writable());
    }

    #[test]
    fn default_path_is_versioned() {
        if let Some(path) = default_key_path() {
            let rendered = path.display().to_string();
            assert!(rendered.contains("paramseal"));
            assert!(rendered.contains(KEY_FORMAT_VERSION));
            assert!(rendered.ends_with(KEY_FILE_NAME));
        }
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryKeyStore::new();
        assert!(store.is_empty());

        let key = store.generate().unwrap();
        store.store(&key).unwrap();
        assert_eq!(store.load().unwrap(), Some(key));
    }

    #[test]
    fn read_only_memory_store_refuses_writes() {
        let store = MemoryKeyStore::new().read_only();
        assert!(!store.is_writable());
        let key = store.generate().unwrap();
        assert!(matches!(store.store(&key), Err(KeyError::Storage(_))));
    }
}
