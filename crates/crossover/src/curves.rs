// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Cost curves built from the workload model, and the thresholds on them.

use crate::{closed_form, sampled, CrossoverError, Crossover, CurveSample};
use comm_kernels::{KernelProfile, ProfileKind};
use cost_model::WorkloadParameters;

/// Payload per rank (bytes) at which LL and HT round trips cost the same,
/// for the workload's base fabric.
pub fn payload_crossover(params: WorkloadParameters) -> Result<Crossover, CrossoverError> {
    params.validate()?;
    let ll = KernelProfile::for_workload(ProfileKind::LowLatency, &params)?;
    let ht = KernelProfile::for_workload(ProfileKind::HighThroughput, &params)?;
    Ok(closed_form(&ll, &ht))
}

/// Converts a per-rank payload into the token count that produces it.
pub fn payload_to_tokens(payload_bytes: f64, params: &WorkloadParameters) -> f64 {
    payload_bytes * params.expert_parallelism as f64 / params.bytes_per_token()
}

/// Samples LL (`a`) and HT (`b`) round-trip time over `payloads` (bytes per rank).
pub fn profile_curve(
    params: WorkloadParameters,
    payloads: &[f64],
) -> Result<Vec<CurveSample>, CrossoverError> {
    params.validate()?;
    let ll = KernelProfile::for_workload(ProfileKind::LowLatency, &params)?;
    let ht = KernelProfile::for_workload(ProfileKind::HighThroughput, &params)?;
    Ok(payloads
        .iter()
        .map(|&x| CurveSample {
            x,
            a: ll.round_trip_ms(x),
            b: ht.round_trip_ms(x),
        })
        .collect())
}

/// Integer token counts, log-spaced over `[min_tokens, max_tokens]`, with
/// duplicates from rounding removed.
pub fn token_grid(
    min_tokens: u64,
    max_tokens: u64,
    count: usize,
) -> Result<Vec<u64>, CrossoverError> {
    let mut grid: Vec<u64> = crate::log_spaced(min_tokens as f64, max_tokens as f64, count)?
        .into_iter()
        .map(|x| x.round() as u64)
        .collect();
    grid.dedup();
    Ok(grid)
}

/// Samples expert compute (`a`) against dispatch + combine (`b`) over
/// `tokens`, using the full cost model at each point.
pub fn compute_comm_curve(
    params: WorkloadParameters,
    tokens: &[u64],
) -> Result<Vec<CurveSample>, CrossoverError> {
    tokens
        .iter()
        .map(|&t| {
            let timings = cost_model::evaluate(params.with_tokens(t))?;
            Ok(CurveSample {
                x: t as f64,
                a: timings.compute_ms,
                b: timings.communication_ms(),
            })
        })
        .collect()
}

/// Token count at which expert compute overtakes the two all-to-all legs
/// (or the reverse), scanned over `count` log-spaced points in
/// `[min_tokens, max_tokens]`.
///
/// Past this point the overlapped pipeline can hide communication
/// entirely behind compute.
pub fn compute_comm_crossover(
    params: WorkloadParameters,
    min_tokens: u64,
    max_tokens: u64,
    count: usize,
) -> Result<Crossover, CrossoverError> {
    let grid = token_grid(min_tokens, max_tokens, count)?;
    let samples = compute_comm_curve(params, &grid)?;
    let result = sampled(&samples)?;
    tracing::debug!(
        min_tokens,
        max_tokens,
        samples = samples.len(),
        "compute/communication crossover: {result}",
    );
    Ok(result)
}
