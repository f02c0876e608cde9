// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # comm-kernels
//!
//! Two communication-kernel profiles for the dispatch/combine all-to-all:
//!
//! | Profile | Latency | Bandwidth | Wins for |
//! |---|---|---|---|
//! | [`ProfileKind::LowLatency`] (LL) | 0.55 × base | 0.70 × base | small payloads |
//! | [`ProfileKind::HighThroughput`] (HT) | 1.15 × base | 1.35 × base | large payloads |
//!
//! Profiles are derived from the caller's base fabric and never mutated.
//! [`pick_optimal`] is a pure query; callers that want to compare can
//! always force either profile through [`ProfileChoice`].
//!
//! # Example
//! ```
//! use comm_kernels::{evaluate_kernel_profiles, ProfileKind};
//! use cost_model::WorkloadParameters;
//!
//! let small = WorkloadParameters::default().with_tokens(16);
//! let cmp = evaluate_kernel_profiles(small).unwrap();
//! assert_eq!(cmp.optimal, ProfileKind::LowLatency);
//! ```

mod error;
mod profile;
mod selector;

pub use error::KernelError;
pub use profile::{KernelProfile, ProfileKind};
pub use selector::{
    evaluate_kernel_profiles, pick_optimal, round_trip_ms, ProfileChoice, ProfileComparison,
    ProfileCost,
};
