// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Schedule: the output of a pipeline policy.
//!
//! A schedule is a list of [`ScheduleBlock`]s, each one phase of one batch
//! occupying one serial [`Resource`] for a time window. The schedule is the
//! contract between the scheduler and whatever renders it.

use crate::{PhaseDurations, SchedulerError};
use std::fmt;

/// Tolerance for floating-point comparisons in [`Schedule::validate`].
const EPS_MS: f64 = 1e-9;

/// One stage of the MoE layer pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Dispatch,
    Compute,
    Combine,
}

impl Phase {
    /// All phases in pipeline order.
    pub const ALL: [Phase; 3] = [Self::Dispatch, Self::Compute, Self::Combine];

    /// The serial resource this phase occupies.
    pub fn resource(&self) -> Resource {
        match self {
            Self::Dispatch | Self::Combine => Resource::Fabric,
            Self::Compute => Resource::ComputeEngine,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dispatch => "dispatch",
            Self::Compute => "compute",
            Self::Combine => "combine",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logical batch in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum BatchId {
    A,
    B,
}

impl BatchId {
    pub const ALL: [BatchId; 2] = [Self::A, Self::B];
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// A serially shared resource. At most one block uses it at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    /// The interconnect; carries dispatch and combine of every batch.
    Fabric,
    /// The expert compute engine.
    ComputeEngine,
}

impl Resource {
    pub const ALL: [Resource; 2] = [Self::Fabric, Self::ComputeEngine];
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fabric => f.write_str("fabric"),
            Self::ComputeEngine => f.write_str("compute"),
        }
    }
}

/// One phase of one batch placed on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ScheduleBlock {
    pub phase: Phase,
    pub batch: BatchId,
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl ScheduleBlock {
    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }

    pub fn resource(&self) -> Resource {
        self.phase.resource()
    }
}

/// A complete timed schedule produced by a [`crate::SchedulePolicy`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Schedule {
    /// Name of the policy that produced this schedule.
    pub policy: String,
    /// Whether the durations were halved for micro-batching.
    pub split: bool,
    /// Durations the policy scheduled (already halved when `split`).
    pub durations: PhaseDurations,
    /// Blocks ordered by start time, then batch, then phase.
    pub blocks: Vec<ScheduleBlock>,
    /// End of the last block.
    pub total_ms: f64,
}

impl Schedule {
    /// Looks up the block for a given phase of a given batch.
    pub fn block(&self, phase: Phase, batch: BatchId) -> Option<&ScheduleBlock> {
        self.blocks
            .iter()
            .find(|b| b.phase == phase && b.batch == batch)
    }

    /// Blocks of one batch in pipeline order.
    pub fn blocks_for(&self, batch: BatchId) -> Vec<&ScheduleBlock> {
        let mut blocks: Vec<&ScheduleBlock> =
            self.blocks.iter().filter(|b| b.batch == batch).collect();
        blocks.sort_by_key(|b| b.phase);
        blocks
    }

    /// Number of distinct batches in the schedule.
    pub fn num_batches(&self) -> usize {
        BatchId::ALL
            .iter()
            .filter(|id| self.blocks.iter().any(|b| b.batch == **id))
            .count()
    }

    /// Total time `resource` is occupied.
    pub fn busy_ms(&self, resource: Resource) -> f64 {
        self.blocks
            .iter()
            .filter(|b| b.resource() == resource)
            .map(|b| b.duration_ms)
            .sum()
    }

    /// Fraction of the schedule during which `resource` is busy.
    pub fn utilization(&self, resource: Resource) -> f64 {
        if self.total_ms <= 0.0 {
            return 0.0;
        }
        self.busy_ms(resource) / self.total_ms
    }

    /// Makespan divided by the number of batches.
    pub fn per_batch_ms(&self) -> f64 {
        match self.num_batches() {
            0 => 0.0,
            n => self.total_ms / n as f64,
        }
    }

    /// Validates the schedule.
    ///
    /// Checks:
    /// - Schedule is non-empty; every block is finite and non-negative.
    /// - Each batch has each phase exactly once, in pipeline order.
    /// - No two blocks overlap on the same resource.
    /// - `total_ms` equals the end of the last block.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.blocks.is_empty() {
            return Err(self.invalid("schedule has no blocks".into()));
        }

        for b in &self.blocks {
            if !(b.start_ms.is_finite() && b.duration_ms.is_finite())
                || b.start_ms < 0.0
                || b.duration_ms < 0.0
            {
                return Err(self.invalid(format!(
                    "{} {} has invalid window start={} duration={}",
                    b.phase, b.batch, b.start_ms, b.duration_ms,
                )));
            }
        }

        // Per-batch phase chain.
        for batch in BatchId::ALL {
            let blocks = self.blocks_for(batch);
            if blocks.is_empty() {
                continue;
            }
            let phases: Vec<Phase> = blocks.iter().map(|b| b.phase).collect();
            if phases != Phase::ALL {
                return Err(self.invalid(format!(
                    "batch {batch} has phases {phases:?}, expected {:?}",
                    Phase::ALL,
                )));
            }
            for w in blocks.windows(2) {
                if w[1].start_ms + EPS_MS < w[0].end_ms() {
                    return Err(self.invalid(format!(
                        "batch {batch}: {} starts at {} before {} ends at {}",
                        w[1].phase,
                        w[1].start_ms,
                        w[0].phase,
                        w[0].end_ms(),
                    )));
                }
            }
        }

        // Resource exclusivity.
        for resource in Resource::ALL {
            let mut blocks: Vec<&ScheduleBlock> = self
                .blocks
                .iter()
                .filter(|b| b.resource() == resource)
                .collect();
            blocks.sort_by(|a, b| a.start_ms.total_cmp(&b.start_ms));
            for w in blocks.windows(2) {
                if w[1].start_ms + EPS_MS < w[0].end_ms() {
                    return Err(self.invalid(format!(
                        "{resource} overlap: {} {} [{}, {}) and {} {} starting at {}",
                        w[0].phase,
                        w[0].batch,
                        w[0].start_ms,
                        w[0].end_ms(),
                        w[1].phase,
                        w[1].batch,
                        w[1].start_ms,
                    )));
                }
            }
        }

        let last_end = self
            .blocks
            .iter()
            .map(|b| b.end_ms())
            .fold(0.0_f64, f64::max);
        if (last_end - self.total_ms).abs() > EPS_MS {
            return Err(self.invalid(format!(
                "total {} ms does not match last block end {} ms",
                self.total_ms, last_end,
            )));
        }

        Ok(())
    }

    fn invalid(&self, detail: String) -> SchedulerError {
        SchedulerError::InvalidSchedule {
            policy: self.policy.clone(),
            detail,
        }
    }

    /// Returns a human-readable summary of the schedule.
    pub fn summary(&self) -> String {
        format!(
            "Schedule '{}'{}: {} batch(es), {} blocks, total {:.4}ms \
             ({:.4}ms/batch), fabric {:.0}% busy, compute {:.0}% busy",
            self.policy,
            if self.split { " (split)" } else { "" },
            self.num_batches(),
            self.blocks.len(),
            self.total_ms,
            self.per_batch_ms(),
            self.utilization(Resource::Fabric) * 100.0,
            self.utilization(Resource::ComputeEngine) * 100.0,
        )
    }
}

/// Builder helper for constructing a `Schedule` block by block.
///
/// Used internally by policy implementations.
pub(crate) struct ScheduleBuilder {
    policy: String,
    durations: PhaseDurations,
    blocks: Vec<ScheduleBlock>,
}

impl ScheduleBuilder {
    pub fn new(policy: &str, durations: PhaseDurations) -> Self {
        Self {
            policy: policy.to_string(),
            durations,
            blocks: Vec::with_capacity(6),
        }
    }

    /// Places `phase` of `batch` at `start_ms` using the configured
    /// duration, and returns the block's end time.
    pub fn place(&mut self, phase: Phase, batch: BatchId, start_ms: f64) -> f64 {
        let block = ScheduleBlock {
            phase,
            batch,
            start_ms,
            duration_ms: self.durations.of(phase),
        };
        self.blocks.push(block);
        block.end_ms()
    }

    /// Consumes the builder and returns the finished schedule.
    pub fn build(mut self) -> Schedule {
        self.blocks.sort_by(|a, b| {
            a.start_ms
                .total_cmp(&b.start_ms)
                .then(a.batch.cmp(&b.batch))
                .then(a.phase.cmp(&b.phase))
        });
        let total_ms = self
            .blocks
            .iter()
            .map(|b| b.end_ms())
            .fold(0.0_f64, f64::max);
        Schedule {
            policy: self.policy,
            split: false,
            durations: self.durations,
            blocks: self.blocks,
            total_ms,
        }
    }
}
