// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # pipeline-scheduler
//!
//! Builds explicit, time-stamped schedules of the dispatch → compute →
//! combine pipeline for up to two logical batches (A and B).
//!
//! # Policies
//!
//! | Policy | Batches | Fabric | Compute engine |
//! |---|---|---|---|
//! | [`Sequential`] | 1 | idle during compute | idle during transfers |
//! | [`DualBatchOverlap`] | 2 | serial across both batches | serial across both batches |
//!
//! The overlapped schedule is a *finite* two-batch instance: it includes
//! pipeline fill and drain, so its total usually exceeds the steady-state
//! closed form `cost_model::Timings::dbo_overlapped_ms`. The two figures
//! are kept separate on purpose.
//!
//! # Trait-Based Extensibility
//!
//! All policies implement [`SchedulePolicy`]:
//!
//! ```ignore
//! struct MyPolicy;
//! impl SchedulePolicy for MyPolicy {
//!     fn name(&self) -> &str { "custom" }
//!     fn schedule(&self, durations: PhaseDurations)
//!         -> Result<Schedule, SchedulerError> { /* ... */ }
//! }
//! ```
//!
//! # Example
//! ```
//! use cost_model::{evaluate, WorkloadParameters};
//! use pipeline_scheduler::{build_schedule, BatchId, Phase, PolicyKind};
//!
//! let timings = evaluate(WorkloadParameters::default()).unwrap();
//! let schedule = build_schedule(&timings, PolicyKind::Overlapped, false).unwrap();
//! let a = schedule.block(Phase::Dispatch, BatchId::A).unwrap();
//! let b = schedule.block(Phase::Dispatch, BatchId::B).unwrap();
//! assert_eq!(b.start_ms, a.end_ms());
//! ```

mod durations;
mod error;
pub mod policy;
mod schedule;

pub use durations::PhaseDurations;
pub use error::SchedulerError;
pub use policy::overlapped::DualBatchOverlap;
pub use policy::sequential::Sequential;
pub use policy::{PolicyKind, SchedulePolicy};
pub use schedule::{BatchId, Phase, Resource, Schedule, ScheduleBlock};

use cost_model::Timings;

/// Builds the schedule for `timings` under `policy`.
///
/// With `split`, every phase duration is halved first (finer
/// micro-batching). Only the schedule sees the halved durations; `timings`
/// and its closed-form totals are untouched.
pub fn build_schedule(
    timings: &Timings,
    policy: PolicyKind,
    split: bool,
) -> Result<Schedule, SchedulerError> {
    let mut durations = PhaseDurations::from_timings(timings)?;
    if split {
        durations = durations.halved();
    }

    let mut schedule = policy.create().schedule(durations)?;
    schedule.split = split;
    schedule.validate()?;

    tracing::debug!("{}", schedule.summary());
    Ok(schedule)
}
