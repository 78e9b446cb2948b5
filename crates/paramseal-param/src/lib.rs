// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted configuration parameters.
//!
//! Parameters marked `encrypted` are sealed with the active encryption
//! context's AES-256-GCM key when written, and opened with it when read.
//! Values written by older installations with the legacy cipher are still
//! readable, and [`set::migrate_records`] rewrites them in the current form.
//!
//! Everything a call needs (user key, context, providers, policy) travels in
//! an explicit [`ExecutionScope`].

pub mod keyring;
pub mod outcome;
pub mod parameter;
pub mod provider;
pub mod scope;
pub mod serde_hooks;
pub mod set;

pub use keyring::ContextKeyRing;
pub use outcome::{DecryptOutcome, ValueSource};
pub use parameter::{EncryptedParameter, ParameterBuilder, ParameterRecord};
pub use provider::{AesGcmProvider, generate_context_key};
pub use scope::{ExecutionScope, StaticContext};
pub use serde_hooks::{ParameterSeed, SealedParameter};
pub use set::MigrationReport;

pub use paramseal_config::MissingContextPolicy;
