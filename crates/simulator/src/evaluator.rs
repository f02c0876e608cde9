// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! End-to-end evaluation of one configuration.

use crate::{SimConfig, SimError};
use comm_kernels::{ProfileComparison, ProfileKind};
use cost_model::{Timings, WorkloadParameters};
use crossover::Crossover;
use pipeline_scheduler::{PolicyKind, Schedule};
use tracing::{debug, info};

/// Everything the model says about one configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Evaluation {
    /// Workload on the base fabric (preset applied, no kernel profile).
    pub params: WorkloadParameters,
    /// Kernel profile whose effective fabric produced `timings`.
    pub applied_profile: Option<ProfileKind>,
    pub timings: Timings,
    /// LL vs HT on the base fabric.
    pub profiles: ProfileComparison,
    /// LL/HT threshold in bytes per rank.
    pub payload_crossover_bytes: Crossover,
    /// The same threshold expressed as a token count.
    pub payload_crossover_tokens: Crossover,
    /// Token count where compute and communication trade dominance.
    pub compute_comm_crossover_tokens: Crossover,
    pub policy: PolicyKind,
    pub schedule: Schedule,
}

impl Evaluation {
    pub fn summary(&self) -> String {
        let profile = self
            .applied_profile
            .map_or("base", |p| p.as_str());
        format!(
            "{} tokens on P={} [{profile}]: seq {:.3} ms, dbo {:.3} ms ({:.2}x), \
             {} schedule {:.3} ms, optimal kernel {}, bottleneck {}",
            self.params.token_count,
            self.params.expert_parallelism,
            self.timings.sequential_total_ms,
            self.timings.dbo_overlapped_ms,
            self.timings.overlap_speedup(),
            self.policy,
            self.schedule.total_ms,
            self.profiles.optimal,
            self.timings.bottleneck(),
        )
    }

    /// Pretty-printed JSON for the rendering layer.
    pub fn to_json(&self) -> Result<String, SimError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SimError::ConfigError(format!("JSON serialise error: {e}")))
    }
}

/// One point of a token-count sweep.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SweepPoint {
    pub tokens: u64,
    pub timings: Timings,
    /// Cheaper kernel profile at this payload.
    pub optimal: ProfileKind,
    pub communication_share: f64,
}

/// Runs the model pipeline for a [`SimConfig`].
pub struct Evaluator {
    config: SimConfig,
}

impl Evaluator {
    pub fn new(config: SimConfig) -> Self {
        info!(
            policy = %config.policy,
            profile = %config.profile,
            fabric = config.fabric.as_deref().unwrap_or("custom"),
            split = config.split,
            "evaluator created",
        );
        Self { config }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Preset → profile choice → timings → profile comparison →
    /// crossovers → schedule.
    pub fn evaluate(&self) -> Result<Evaluation, SimError> {
        let params = self.config.resolve_workload()?;
        let policy = self.config.create_policy()?;
        let choice = self.config.parse_profile()?;
        self.config.sweep.validate()?;

        let (effective, applied_profile) = choice.apply(params)?;
        if let Some(kind) = applied_profile {
            debug!(
                latency_us = effective.latency_us,
                bandwidth_gbps = effective.bandwidth_gbps,
                "applied {} kernel profile",
                kind.name(),
            );
        }

        let timings = cost_model::evaluate(effective)?;
        info!("{}", timings.summary());

        let profiles = comm_kernels::evaluate_kernel_profiles(params)?;
        let payload_crossover_bytes = crossover::payload_crossover(params)?;
        let payload_crossover_tokens =
            payload_crossover_bytes.map(|bytes| crossover::payload_to_tokens(bytes, &params));
        let sweep = self.config.sweep;
        let compute_comm_crossover_tokens = crossover::compute_comm_crossover(
            effective,
            sweep.min_tokens,
            sweep.max_tokens,
            sweep.samples,
        )?;

        let schedule = pipeline_scheduler::build_schedule(&timings, policy, self.config.split)?;

        let evaluation = Evaluation {
            params,
            applied_profile,
            timings,
            profiles,
            payload_crossover_bytes,
            payload_crossover_tokens,
            compute_comm_crossover_tokens,
            policy,
            schedule,
        };
        info!("{}", evaluation.summary());
        Ok(evaluation)
    }

    /// Evaluates the configured workload at log-spaced token counts over
    /// the sweep range, applying the profile choice at every point.
    pub fn sweep(&self) -> Result<Vec<SweepPoint>, SimError> {
        let params = self.config.resolve_workload()?;
        let choice = self.config.parse_profile()?;
        let sweep = self.config.sweep;
        sweep.validate()?;

        let grid = crossover::token_grid(sweep.min_tokens, sweep.max_tokens, sweep.samples)?;
        let points = grid
            .into_iter()
            .map(|tokens| {
                let base = params.with_tokens(tokens);
                let (effective, _) = choice.apply(base)?;
                let timings = cost_model::evaluate(effective)?;
                let optimal = comm_kernels::pick_optimal(base)?;
                Ok(SweepPoint {
                    tokens,
                    timings,
                    optimal,
                    communication_share: timings.communication_share(),
                })
            })
            .collect::<Result<Vec<_>, SimError>>()?;

        info!(points = points.len(), "sweep complete");
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate(config: SimConfig) -> Evaluation {
        Evaluator::new(config).evaluate().unwrap()
    }

    #[test]
    fn test_reference_evaluation() {
        let e = evaluate(SimConfig::default());
        assert_eq!(e.applied_profile, None);
        assert_eq!(e.policy, PolicyKind::Overlapped);
        assert_eq!(e.params, WorkloadParameters::default());
        assert!(e.timings.sequential_total_ms > 0.0);
        assert!(e.payload_crossover_bytes.value().is_some());
        assert_eq!(e.schedule.num_batches(), 2);
        assert!(!e.summary().is_empty());
    }

    #[test]
    fn test_payload_crossover_tokens_consistent() {
        let e = evaluate(SimConfig::default());
        let bytes = e.payload_crossover_bytes.value().unwrap();
        let tokens = e.payload_crossover_tokens.value().unwrap();
        let back = e.params.bytes_per_token() * tokens
            / e.params.expert_parallelism as f64;
        assert!((back - bytes).abs() / bytes < 1e-9);
    }

    #[test]
    fn test_profile_choice_changes_timings() {
        let base = evaluate(SimConfig::default());
        let ht = evaluate(SimConfig {
            profile: "ht".into(),
            ..Default::default()
        });
        assert_eq!(ht.applied_profile, Some(ProfileKind::HighThroughput));
        assert_eq!(ht.timings.compute_ms, base.timings.compute_ms);
        assert_ne!(ht.timings.dispatch_ms, base.timings.dispatch_ms);
        // The comparison is always reported on the base fabric.
        assert_eq!(ht.profiles, base.profiles);
    }

    #[test]
    fn test_auto_profile_picks_optimal() {
        let e = evaluate(SimConfig {
            profile: "auto".into(),
            ..Default::default()
        });
        assert_eq!(e.applied_profile, Some(e.profiles.optimal));
    }

    #[test]
    fn test_sequential_split() {
        let e = evaluate(SimConfig {
            policy: "sequential".into(),
            split: true,
            ..Default::default()
        });
        assert_eq!(e.schedule.num_batches(), 1);
        assert!(e.schedule.split);
        let half = e.timings.sequential_total_ms / 2.0;
        assert!((e.schedule.total_ms - half).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_config() {
        let result = Evaluator::new(SimConfig {
            policy: "pipelined".into(),
            ..Default::default()
        })
        .evaluate();
        assert!(matches!(result, Err(SimError::SchedulerError(_))));
    }

    #[test]
    fn test_to_json() {
        let json = evaluate(SimConfig::default()).to_json().unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["policy"], "overlapped");
        assert_eq!(v["payload_crossover_bytes"]["kind"], "at");
        assert!(v["timings"]["dispatch_ms"].is_number());
        assert!(v["schedule"]["blocks"].is_array());
    }

    #[test]
    fn test_sweep() {
        let config = SimConfig {
            sweep: crate::SweepConfig {
                min_tokens: 16,
                max_tokens: 1 << 16,
                samples: 8,
            },
            ..Default::default()
        };
        let points = Evaluator::new(config).sweep().unwrap();
        assert_eq!(points.len(), 8);
        assert!(points.windows(2).all(|w| w[0].tokens < w[1].tokens));
        assert_eq!(points[0].tokens, 16);
        assert_eq!(points[7].tokens, 1 << 16);
        // Small payloads favour LL, large ones HT.
        assert_eq!(points[0].optimal, ProfileKind::LowLatency);
        assert_eq!(points[7].optimal, ProfileKind::HighThroughput);
    }

    #[test]
    fn test_sweep_rejects_bad_range() {
        let config = SimConfig {
            sweep: crate::SweepConfig {
                min_tokens: 100,
                max_tokens: 10,
                samples: 8,
            },
            ..Default::default()
        };
        assert!(matches!(
            Evaluator::new(config).sweep(),
            Err(SimError::ConfigError(_))
        ));
    }
}
