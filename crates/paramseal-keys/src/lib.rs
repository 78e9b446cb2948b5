// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User key storage and lifecycle for paramseal.
//!
//! [`FileKeyStore`] persists one length-prefixed key blob at a versioned path
//! in the data directory; [`MemoryKeyStore`] keeps it in memory. A
//! [`KeyManager`] caches the current user key for one execution scope and
//! generates a key on demand.

pub mod manager;
pub mod store;

pub use manager::KeyManager;
pub use store::{FileKeyStore, MemoryKeyStore, default_key_path, generate_key};
