// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # cost-model
//!
//! Closed-form latency model for one Mixture-of-Experts layer whose experts
//! are spread over `P` expert-parallel ranks.
//!
//! A step is split into three phases:
//!
//! ```text
//! dispatch  (all-to-all, fabric)   tokens → expert ranks
//! compute   (expert FFNs, engine)  slowest rank dictates the phase
//! combine   (all-to-all, fabric)   expert outputs → origin ranks
//! ```
//!
//! - [`WorkloadParameters`]: the immutable input snapshot.
//! - [`Timings`]: per-phase times plus the sequential and overlapped totals.
//! - [`phase`]: the individual formulas, each a pure function.
//! - [`FabricPreset`]: named interconnect figures for quick what-ifs.
//!
//! # Example
//! ```
//! use cost_model::WorkloadParameters;
//!
//! let params = WorkloadParameters::default().with_tokens(4096);
//! let t = cost_model::evaluate(params).unwrap();
//! assert_eq!(t.combine_ms, t.dispatch_ms);
//! assert!(t.dbo_overlapped_ms <= t.sequential_total_ms);
//! ```

mod error;
mod fabric;
mod params;
pub mod phase;
mod timings;

pub use error::ModelError;
pub use fabric::FabricPreset;
pub use params::WorkloadParameters;
pub use phase::evaluate;
pub use timings::{Bottleneck, Timings};
