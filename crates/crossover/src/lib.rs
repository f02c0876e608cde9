// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # crossover
//!
//! Finds the point where two competing cost curves swap dominance.
//!
//! - [`closed_form`] solves two straight cost lines exactly and is the
//!   ground truth (LL vs HT round trip as a function of payload).
//! - [`sampled`] scans pre-computed curve samples, detects the sign flip of
//!   `a − b` and interpolates in log-x space. It works for any curves,
//!   including the non-linear compute-vs-communication pair.
//!
//! Both return a [`Crossover`]; "no crossover" is an ordinary value,
//! never an error or a sentinel number.
//!
//! # Example
//! ```
//! use cost_model::WorkloadParameters;
//!
//! let params = WorkloadParameters::default();
//! let threshold = crossover::payload_crossover(params).unwrap();
//! let bytes = threshold.value().expect("LL and HT cross for the reference fabric");
//! assert!(bytes > 0.0);
//! ```

mod curves;
mod error;
mod solver;

pub use curves::{
    compute_comm_crossover, compute_comm_curve, payload_crossover, payload_to_tokens,
    profile_curve, token_grid,
};
pub use error::CrossoverError;
pub use solver::{closed_form, log_spaced, sampled, CostLine, Crossover, CurveSample};
