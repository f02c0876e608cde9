// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Sequential policy.
//!
//! A single batch walks through the pipeline with no overlap:
//!
//! ```text
//! fabric   [dispatch A]                [combine A]
//! compute              [compute A  ]
//! ```
//!
//! # When to use
//! - Baseline for judging what overlap buys.
//! - Workloads too small to split into two batches.

use crate::schedule::ScheduleBuilder;
use crate::{BatchId, Phase, PhaseDurations, Schedule, SchedulePolicy, SchedulerError};

/// One batch, phases strictly chained.
#[derive(Debug, Clone, Default)]
pub struct Sequential;

impl Sequential {
    pub fn new() -> Self {
        Self
    }
}

impl SchedulePolicy for Sequential {
    fn name(&self) -> &str {
        "sequential"
    }

    fn schedule(&self, durations: PhaseDurations) -> Result<Schedule, SchedulerError> {
        durations.validate()?;

        let mut builder = ScheduleBuilder::new(self.name(), durations);
        let dispatch_end = builder.place(Phase::Dispatch, BatchId::A, 0.0);
        let compute_end = builder.place(Phase::Compute, BatchId::A, dispatch_end);
        builder.place(Phase::Combine, BatchId::A, compute_end);

        let schedule = builder.build();
        schedule.validate()?;
        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn durations(d: f64, c: f64, b: f64) -> PhaseDurations {
        PhaseDurations::new(d, c, b).unwrap()
    }

    #[test]
    fn test_sequential_basic() {
        let s = Sequential::new().schedule(durations(1.5, 4.0, 1.5)).unwrap();
        assert_eq!(s.num_batches(), 1);
        assert_eq!(s.blocks.len(), 3);

        let combine = s.block(Phase::Combine, BatchId::A).unwrap();
        assert_eq!(combine.end_ms(), 1.5 + 4.0 + 1.5);
        assert_eq!(s.total_ms, combine.end_ms());
    }

    #[test]
    fn test_sequential_chain() {
        let s = Sequential::new().schedule(durations(0.3, 0.7, 0.3)).unwrap();
        let blocks = s.blocks_for(BatchId::A);
        assert_eq!(blocks[0].start_ms, 0.0);
        assert_eq!(blocks[1].start_ms, blocks[0].end_ms());
        assert_eq!(blocks[2].start_ms, blocks[1].end_ms());
    }

    #[test]
    fn test_sequential_has_no_batch_b() {
        let s = Sequential::new().schedule(durations(1.0, 1.0, 1.0)).unwrap();
        assert!(s.blocks_for(BatchId::B).is_empty());
    }

    #[test]
    fn test_sequential_rejects_negative() {
        let bad = PhaseDurations {
            dispatch_ms: 1.0,
            compute_ms: -1.0,
            combine_ms: 1.0,
        };
        assert!(matches!(
            Sequential::new().schedule(bad),
            Err(SchedulerError::InvalidDuration { .. })
        ));
    }
}
