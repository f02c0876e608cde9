// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the crossover solvers.

/// Errors that can occur while solving for a crossover.
///
/// A missing crossover is *not* an error; see [`crate::Crossover::Never`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CrossoverError {
    /// The sampled curve cannot be scanned.
    #[error("invalid curve samples: {0}")]
    InvalidSamples(String),

    /// The workload could not be evaluated by the cost model.
    #[error("cost model error: {0}")]
    Model(#[from] cost_model::ModelError),

    /// A kernel profile could not be derived.
    #[error("kernel profile error: {0}")]
    Kernel(#[from] comm_kernels::KernelError),
}
