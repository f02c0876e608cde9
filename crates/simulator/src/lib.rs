// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # simulator
//!
//! Entry points the rendering layer calls, plus a configuration-driven
//! [`Evaluator`] that runs the whole model in one go.
//!
//! The four entry points are pure functions of their inputs:
//!
//! | Function | Input | Output |
//! |---|---|---|
//! | [`evaluate_timings`] | `WorkloadParameters` | `Timings` |
//! | [`evaluate_kernel_profiles`] | `WorkloadParameters` | LL/HT costs + optimal |
//! | [`find_crossover`] | samples, profiles, or a workload | `Crossover` |
//! | [`build_schedule`] | `Timings`, policy, split flag | `Schedule` |
//!
//! Everything returned derives `serde::Serialize`, so outputs can be handed
//! to a front end as JSON without recomputation.
//!
//! # Pipeline
//! ```text
//! SimConfig ──resolve──▶ WorkloadParameters ──▶ Timings ──▶ Schedule
//!                               │                  │
//!                               ├──▶ ProfileComparison
//!                               └──▶ Crossover thresholds
//! ```

mod api;
mod config;
mod error;
mod evaluator;

pub use api::{
    build_schedule, evaluate_kernel_profiles, evaluate_timings, find_crossover, CrossoverInput,
};
pub use config::{SimConfig, SweepConfig};
pub use error::SimError;
pub use evaluator::{Evaluation, Evaluator, SweepPoint};
