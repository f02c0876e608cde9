// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Stateless entry points over the four model components.

use crate::SimError;
use comm_kernels::{KernelProfile, ProfileComparison};
use cost_model::{Timings, WorkloadParameters};
use crossover::{Crossover, CurveSample};
use pipeline_scheduler::{PolicyKind, Schedule};

/// Source data for a crossover query.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum CrossoverInput {
    /// Two sampled cost curves over a positive, increasing domain.
    Samples { samples: Vec<CurveSample> },
    /// Two linear cost models; the crossing is solved in closed form.
    Profiles { a: KernelProfile, b: KernelProfile },
    /// LL vs HT on the workload's base fabric, in bytes per rank.
    Workload { params: WorkloadParameters },
}

/// Phase timings for one MoE layer.
pub fn evaluate_timings(params: WorkloadParameters) -> Result<Timings, SimError> {
    Ok(cost_model::evaluate(params)?)
}

/// LL vs HT round-trip comparison for the workload's payload.
pub fn evaluate_kernel_profiles(params: WorkloadParameters) -> Result<ProfileComparison, SimError> {
    Ok(comm_kernels::evaluate_kernel_profiles(params)?)
}

/// Solves for the point where two cost curves cross.
pub fn find_crossover(input: &CrossoverInput) -> Result<Crossover, SimError> {
    let result = match input {
        CrossoverInput::Samples { samples } => crossover::sampled(samples)?,
        CrossoverInput::Profiles { a, b } => crossover::closed_form(a, b),
        CrossoverInput::Workload { params } => crossover::payload_crossover(*params)?,
    };
    Ok(result)
}

/// Lays out the phases of `timings` under `policy`.
pub fn build_schedule(
    timings: &Timings,
    policy: PolicyKind,
    split: bool,
) -> Result<Schedule, SimError> {
    Ok(pipeline_scheduler::build_schedule(timings, policy, split)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use comm_kernels::ProfileKind;

    #[test]
    fn test_evaluate_timings_reference() {
        let t = evaluate_timings(WorkloadParameters::default()).unwrap();
        assert!(t.dispatch_ms > 0.0);
        assert!(t.dbo_overlapped_ms <= t.sequential_total_ms);
    }

    #[test]
    fn test_evaluate_timings_invalid() {
        let p = WorkloadParameters {
            bandwidth_gbps: 0.0,
            ..Default::default()
        };
        assert!(matches!(evaluate_timings(p), Err(SimError::ModelError(_))));
    }

    #[test]
    fn test_kernel_profiles_invalid() {
        let p = WorkloadParameters {
            expert_parallelism: 0,
            ..Default::default()
        };
        assert!(matches!(
            evaluate_kernel_profiles(p),
            Err(SimError::KernelError(_))
        ));
    }

    #[test]
    fn test_find_crossover_identical_profiles() {
        let p = KernelProfile::derive(ProfileKind::LowLatency, 25.0, 25.0).unwrap();
        let input = CrossoverInput::Profiles { a: p, b: p };
        assert_eq!(find_crossover(&input).unwrap(), Crossover::Never);
    }

    #[test]
    fn test_find_crossover_workload_matches_profiles() {
        let params = WorkloadParameters::default();
        let ll = KernelProfile::for_workload(ProfileKind::LowLatency, &params).unwrap();
        let ht = KernelProfile::for_workload(ProfileKind::HighThroughput, &params).unwrap();
        let a = find_crossover(&CrossoverInput::Profiles { a: ll, b: ht }).unwrap();
        let b = find_crossover(&CrossoverInput::Workload { params }).unwrap();
        assert_eq!(a, b);
        assert!(a.value().is_some());
    }

    #[test]
    fn test_find_crossover_samples() {
        let samples = vec![
            CurveSample { x: 1.0, a: 1.0, b: 3.0 },
            CurveSample { x: 10.0, a: 5.0, b: 3.0 },
        ];
        let v = find_crossover(&CrossoverInput::Samples { samples })
            .unwrap()
            .value()
            .unwrap();
        assert!(v > 1.0 && v < 10.0);
    }

    #[test]
    fn test_find_crossover_bad_samples() {
        let input = CrossoverInput::Samples { samples: vec![] };
        assert!(matches!(
            find_crossover(&input),
            Err(SimError::CrossoverError(_))
        ));
    }

    #[test]
    fn test_build_schedule_rejects_nan() {
        let t = Timings::from_phases(f64::NAN, 1.0, f64::NAN);
        assert!(matches!(
            build_schedule(&t, PolicyKind::Overlapped, false),
            Err(SimError::SchedulerError(_))
        ));
    }
}
