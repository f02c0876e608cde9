// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the simulator.

/// Errors that can occur while evaluating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The workload parameters are invalid.
    #[error("model error: {0}")]
    ModelError(#[from] cost_model::ModelError),

    /// A kernel profile could not be derived or parsed.
    #[error("kernel profile error: {0}")]
    KernelError(#[from] comm_kernels::KernelError),

    /// A crossover could not be solved.
    #[error("crossover error: {0}")]
    CrossoverError(#[from] crossover::CrossoverError),

    /// The schedule could not be built.
    #[error("scheduler error: {0}")]
    SchedulerError(#[from] pipeline_scheduler::SchedulerError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}
