// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the pipeline scheduler.

use crate::Phase;

/// Errors that can occur while building a schedule.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchedulerError {
    /// The policy name did not match any known policy.
    #[error("unknown policy '{0}'; expected 'sequential' or 'overlapped'")]
    UnknownPolicy(String),

    /// A phase duration is negative, NaN or infinite.
    #[error("invalid {phase} duration: {value} ms (must be finite and >= 0)")]
    InvalidDuration { phase: Phase, value: f64 },

    /// A built schedule violated an ordering or resource constraint.
    #[error("policy '{policy}' produced an invalid schedule: {detail}")]
    InvalidSchedule { policy: String, detail: String },
}
