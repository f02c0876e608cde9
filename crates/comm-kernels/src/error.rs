// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for kernel-profile selection.

/// Errors that can occur while deriving or selecting kernel profiles.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    /// The workload or base fabric is invalid.
    #[error("cost model error: {0}")]
    Model(#[from] cost_model::ModelError),

    /// A profile name did not match any known profile.
    #[error("unknown kernel profile '{0}'; expected 'll', 'ht', 'auto', or 'base'")]
    UnknownProfile(String),
}
