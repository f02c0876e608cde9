// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Dual-batch overlap (DBO) policy.
//!
//! Two batches share two serial resources: the fabric (both all-to-all
//! legs of both batches, one transfer at a time) and the compute engine
//! (one batch's experts at a time). Batch B's dispatch rides the fabric
//! while batch A computes:
//!
//! ```text
//! fabric   [dispatch A][dispatch B]   [combine A]   [combine B]
//! compute              [compute A  ][compute B  ]
//! ```
//!
//! # Constraints
//!
//! ```text
//! dispatch B  starts at  end(dispatch A)
//! compute A   starts at  end(dispatch A)
//! compute B   starts at  max(end(dispatch B), end(compute A))
//! combine A   starts at  max(end(compute A), end(dispatch B))
//! combine B   starts at  max(end(compute B), end(combine A))
//! total                = max(end(combine A), end(combine B))
//! ```
//!
//! The result is one concrete pipeline instance, fill and drain included.
//! It is not the steady-state bound `max(dispatch + combine, compute)`.

use crate::schedule::ScheduleBuilder;
use crate::{BatchId, Phase, PhaseDurations, Schedule, SchedulePolicy, SchedulerError};

/// Two batches, software-pipelined over a shared fabric and compute engine.
#[derive(Debug, Clone, Default)]
pub struct DualBatchOverlap;

impl DualBatchOverlap {
    pub fn new() -> Self {
        Self
    }
}

impl SchedulePolicy for DualBatchOverlap {
    fn name(&self) -> &str {
        "overlapped"
    }

    fn schedule(&self, durations: PhaseDurations) -> Result<Schedule, SchedulerError> {
        durations.validate()?;

        let mut builder = ScheduleBuilder::new(self.name(), durations);

        let dispatch_a = builder.place(Phase::Dispatch, BatchId::A, 0.0);
        // Fabric is busy with A's dispatch until then.
        let dispatch_b = builder.place(Phase::Dispatch, BatchId::B, dispatch_a);
        let compute_a = builder.place(Phase::Compute, BatchId::A, dispatch_a);
        // Engine serialises batches; B's activations must also have arrived.
        let compute_b = builder.place(Phase::Compute, BatchId::B, dispatch_b.max(compute_a));
        // Fabric may still be carrying dispatch B.
        let combine_a = builder.place(Phase::Combine, BatchId::A, compute_a.max(dispatch_b));
        builder.place(Phase::Combine, BatchId::B, compute_b.max(combine_a));

        let schedule = builder.build();
        schedule.validate()?;
        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Resource;

    fn run(d: f64, c: f64, b: f64) -> Schedule {
        DualBatchOverlap::new()
            .schedule(PhaseDurations::new(d, c, b).unwrap())
            .unwrap()
    }

    fn start(s: &Schedule, phase: Phase, batch: BatchId) -> f64 {
        s.block(phase, batch).unwrap().start_ms
    }

    fn end(s: &Schedule, phase: Phase, batch: BatchId) -> f64 {
        s.block(phase, batch).unwrap().end_ms()
    }

    #[test]
    fn test_fabric_serialisation() {
        let s = run(0.8, 1.3, 0.8);
        assert_eq!(
            start(&s, Phase::Dispatch, BatchId::B),
            end(&s, Phase::Dispatch, BatchId::A)
        );
        assert!(start(&s, Phase::Combine, BatchId::B) >= end(&s, Phase::Combine, BatchId::A));
    }

    #[test]
    fn test_compute_bound() {
        // d=1, c=4: dA[0,1) dB[1,2) cA[1,5) cB[5,9) bA[5,6) bB[9,10)
        let s = run(1.0, 4.0, 1.0);
        assert_eq!(start(&s, Phase::Compute, BatchId::B), 5.0);
        assert_eq!(start(&s, Phase::Combine, BatchId::A), 5.0);
        assert_eq!(start(&s, Phase::Combine, BatchId::B), 9.0);
        assert_eq!(s.total_ms, 10.0);
    }

    #[test]
    fn test_fabric_bound() {
        // d=3, c=1: dA[0,3) dB[3,6) cA[3,4) cB[6,7) bA[6,9) bB[9,12)
        let s = run(3.0, 1.0, 3.0);
        assert_eq!(start(&s, Phase::Compute, BatchId::B), 6.0);
        assert_eq!(start(&s, Phase::Combine, BatchId::A), 6.0);
        assert_eq!(start(&s, Phase::Combine, BatchId::B), 9.0);
        assert_eq!(s.total_ms, 12.0);
        // The fabric never idles after the first dispatch.
        assert_eq!(s.utilization(Resource::Fabric), 1.0);
    }

    #[test]
    fn test_finite_schedule_exceeds_steady_state() {
        let (d, c, b) = (1.0, 2.0, 1.0);
        let s = run(d, c, b);
        let steady = (d + b).max(c);
        // Two batches in steady state would take 2 * steady; fill and drain add more.
        assert!(s.total_ms >= 2.0 * steady);
        // But it never loses to running the two batches back to back.
        assert!(s.total_ms <= 2.0 * (d + c + b));
    }

    #[test]
    fn test_zero_compute() {
        let s = run(1.0, 0.0, 1.0);
        assert_eq!(s.total_ms, 4.0);
        s.validate().unwrap();
    }

    #[test]
    fn test_all_zero() {
        let s = run(0.0, 0.0, 0.0);
        assert_eq!(s.total_ms, 0.0);
        assert_eq!(s.num_batches(), 2);
    }

    #[test]
    fn test_rejects_nan() {
        let bad = PhaseDurations {
            dispatch_ms: f64::NAN,
            compute_ms: 1.0,
            combine_ms: 1.0,
        };
        assert!(DualBatchOverlap::new().schedule(bad).is_err());
    }
}
