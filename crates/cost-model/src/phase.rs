// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-phase cost formulas.
//!
//! Every function here is pure. The `*_time_ms` functions validate their
//! input and reject non-finite results; the factor helpers are plain
//! arithmetic and can be plotted independently.
//!
//! # Compute model
//!
//! ```text
//! mean_load   = token_count * top_k / P
//! max_load    = mean_load * random_variation * straggler
//! straggler   = (1 + 2.2 * skew) * (1 + 0.12 * log2(P))
//! compute_ms  = max_load * compute_us_per_token / 1000
//! ```

use crate::error::ensure_finite;
use crate::{ModelError, Timings, WorkloadParameters};

/// Microseconds per millisecond.
pub const US_PER_MS: f64 = 1_000.0;

/// Bytes per gigabyte (decimal, as quoted for link bandwidth).
pub const BYTES_PER_GB: f64 = 1e9;

/// Scale of the finite-batch sampling noise term.
pub const RANDOM_VARIATION_COEFF: f64 = 3.2;

/// How strongly routing skew inflates the worst rank's load.
pub const SKEW_IMBALANCE_COEFF: f64 = 2.2;

/// Per-doubling coordination tax of a wider expert-parallel group.
pub const COORDINATION_COEFF: f64 = 0.12;

/// Bytes each rank sends in one all-to-all leg, assuming perfectly
/// balanced traffic.
///
/// Routing skew is deliberately not applied here; it is folded into
/// [`straggler_factor`] on the compute side.
pub fn payload_bytes_per_rank(
    token_count: u64,
    top_k: u32,
    hidden_dimension: u32,
    bytes_per_element: f64,
    expert_parallelism: u32,
) -> f64 {
    token_count as f64 * top_k as f64 * hidden_dimension as f64 * bytes_per_element
        / expert_parallelism as f64
}

/// Latency-plus-bandwidth time of a single transfer in milliseconds.
pub fn transfer_time_ms(latency_ms: f64, bandwidth_gbps: f64, payload_bytes: f64) -> f64 {
    latency_ms + payload_bytes / (bandwidth_gbps * BYTES_PER_GB) * US_PER_MS
}

/// Time of the dispatch all-to-all in milliseconds.
pub fn dispatch_time_ms(params: WorkloadParameters) -> Result<f64, ModelError> {
    params.validate()?;
    let t = transfer_time_ms(
        params.latency_us / US_PER_MS,
        params.bandwidth_gbps,
        params.payload_bytes_per_rank(),
    );
    ensure_finite("dispatch_ms", t)
}

/// Time of the combine all-to-all in milliseconds.
///
/// Both legs carry the same payload, so this is exactly the dispatch time.
pub fn combine_time_ms(params: WorkloadParameters) -> Result<f64, ModelError> {
    dispatch_time_ms(params)
}

/// Inflation from finite-batch sampling noise; shrinks as the batch grows.
///
/// Depends on the token count only, never on skew.
pub fn random_variation_factor(token_count: u64) -> f64 {
    1.0 + RANDOM_VARIATION_COEFF / (token_count.max(1) as f64).sqrt()
}

/// Worst-rank inflation caused by routing skew.
pub fn structural_imbalance(skew: f64) -> f64 {
    1.0 + SKEW_IMBALANCE_COEFF * skew
}

/// Logarithmic coordination tax of an expert-parallel group of size `P`.
///
/// A single-rank group pays nothing: `coordination_penalty(1) == 1.0`.
pub fn coordination_penalty(expert_parallelism: u32) -> f64 {
    1.0 + COORDINATION_COEFF * (expert_parallelism as f64).log2()
}

/// Combined straggler factor applied to the mean per-rank load.
pub fn straggler_factor(skew: f64, expert_parallelism: u32) -> f64 {
    structural_imbalance(skew) * coordination_penalty(expert_parallelism)
}

/// Routed tokens handled by the slowest rank.
pub fn max_expert_load(params: &WorkloadParameters) -> f64 {
    let routed_tokens = params.token_count as f64 * params.top_k as f64;
    let mean_load = routed_tokens / params.expert_parallelism as f64;
    mean_load
        * random_variation_factor(params.token_count)
        * straggler_factor(params.load_imbalance_skew, params.expert_parallelism)
}

/// Time of the expert compute phase in milliseconds.
pub fn compute_time_ms(params: WorkloadParameters) -> Result<f64, ModelError> {
    params.validate()?;
    let t = max_expert_load(&params) * params.compute_us_per_token / US_PER_MS;
    ensure_finite("compute_ms", t)
}

/// Folds the three phase times into `(sequential_total_ms, dbo_overlapped_ms)`.
///
/// The overlapped figure is the steady-state bound: with ideal pipelining
/// the fabric (both legs) and the compute engine run concurrently, so the
/// busier resource sets the pace.
pub fn aggregate(dispatch_ms: f64, compute_ms: f64, combine_ms: f64) -> (f64, f64) {
    let sequential = dispatch_ms + compute_ms + combine_ms;
    let overlapped = (dispatch_ms + combine_ms).max(compute_ms);
    (sequential, overlapped)
}

/// Evaluates the full model for one parameter snapshot.
///
/// A step with zero tokens issues no all-to-all at all, so every field of
/// the result is zero (the fixed latency is not charged).
pub fn evaluate(params: WorkloadParameters) -> Result<Timings, ModelError> {
    params.validate()?;

    if params.token_count == 0 {
        tracing::debug!("empty step → all-zero timings");
        return Ok(Timings::zero());
    }

    let dispatch = dispatch_time_ms(params)?;
    let compute = compute_time_ms(params)?;
    let combine = combine_time_ms(params)?;

    tracing::debug!(
        payload_bytes = params.payload_bytes_per_rank(),
        dispatch_ms = dispatch,
        compute_ms = compute,
        "phase times derived",
    );

    let timings = Timings::from_phases(dispatch, compute, combine);
    ensure_finite("sequential_total_ms", timings.sequential_total_ms)?;
    Ok(timings)
}
