// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Derived timing record.

use std::fmt;

/// Which serial resource limits the overlapped pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bottleneck {
    /// Dispatch + combine on the fabric outweigh expert compute.
    Fabric,
    /// Expert compute outweighs both all-to-all legs.
    Compute,
    /// Both resources are exactly equally loaded.
    Balanced,
}

impl fmt::Display for Bottleneck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fabric => "fabric",
            Self::Compute => "compute",
            Self::Balanced => "balanced",
        };
        f.write_str(s)
    }
}

/// Phase-level times of one MoE layer step, all in milliseconds.
///
/// Invariants (for any `Timings` produced by [`crate::evaluate`]):
/// - every field is finite and `>= 0`;
/// - `combine_ms == dispatch_ms`;
/// - `dbo_overlapped_ms <= sequential_total_ms`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timings {
    pub dispatch_ms: f64,
    pub compute_ms: f64,
    pub combine_ms: f64,
    /// `dispatch + compute + combine`.
    pub sequential_total_ms: f64,
    /// Steady-state overlapped time, `max(dispatch + combine, compute)`.
    pub dbo_overlapped_ms: f64,
}

impl Timings {
    /// Builds a record from the three phase times.
    pub fn from_phases(dispatch_ms: f64, compute_ms: f64, combine_ms: f64) -> Self {
        let (sequential_total_ms, dbo_overlapped_ms) =
            crate::phase::aggregate(dispatch_ms, compute_ms, combine_ms);
        Self {
            dispatch_ms,
            compute_ms,
            combine_ms,
            sequential_total_ms,
            dbo_overlapped_ms,
        }
    }

    /// The all-zero record of an empty step.
    pub fn zero() -> Self {
        Self::from_phases(0.0, 0.0, 0.0)
    }

    /// Time both all-to-all legs occupy the fabric.
    pub fn communication_ms(&self) -> f64 {
        self.dispatch_ms + self.combine_ms
    }

    /// Fraction of the sequential total spent on communication.
    ///
    /// Returns `0.0` for an empty step.
    pub fn communication_share(&self) -> f64 {
        if self.sequential_total_ms <= 0.0 {
            return 0.0;
        }
        self.communication_ms() / self.sequential_total_ms
    }

    /// Steady-state speedup of overlap over sequential execution (`>= 1`).
    ///
    /// Returns `1.0` for an empty step.
    pub fn overlap_speedup(&self) -> f64 {
        if self.dbo_overlapped_ms <= 0.0 {
            return 1.0;
        }
        self.sequential_total_ms / self.dbo_overlapped_ms
    }

    /// Time overlap removes from the critical path per step.
    pub fn hidden_ms(&self) -> f64 {
        self.sequential_total_ms - self.dbo_overlapped_ms
    }

    /// The resource that bounds the overlapped pipeline.
    pub fn bottleneck(&self) -> Bottleneck {
        let comm = self.communication_ms();
        if comm > self.compute_ms {
            Bottleneck::Fabric
        } else if self.compute_ms > comm {
            Bottleneck::Compute
        } else {
            Bottleneck::Balanced
        }
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        format!(
            "dispatch {:.4}ms, compute {:.4}ms, combine {:.4}ms | sequential {:.4}ms, \
             overlapped {:.4}ms ({:.2}x, {:.0}% comm, {}-bound)",
            self.dispatch_ms,
            self.compute_ms,
            self.combine_ms,
            self.sequential_total_ms,
            self.dbo_overlapped_ms,
            self.overlap_speedup(),
            self.communication_share() * 100.0,
            self.bottleneck(),
        )
    }
}
