// SPDX-FileCopyrightText: 2026 Paramseal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for paramseal integration tests.
//!
//! # Components
//!
//! - [`TestScope`] - an [`ExecutionScope`](paramseal_param::ExecutionScope)
//!   with known context keys and a user key, optionally file-backed
//! - [`MockProviders`] - a provider factory that fails on demand

pub mod harness;
pub mod mock_providers;

pub use harness::{TestScope, TestScopeBuilder};
pub use mock_providers::{Failure, MockProviders};
