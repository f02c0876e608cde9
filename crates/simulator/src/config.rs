// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Simulator configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! fabric = "ib-ndr"        # optional preset, overrides latency/bandwidth
//! policy = "overlapped"    # or "sequential"
//! split = false
//! profile = "auto"         # "base", "auto", "ll" or "ht"
//!
//! [workload]
//! token_count = 4096
//! expert_parallelism = 32
//! load_imbalance_skew = 0.2
//!
//! [sweep]
//! min_tokens = 1
//! max_tokens = 1048576
//! samples = 64
//! ```
//!
//! Every key is optional; omitted workload fields fall back to the
//! reference scenario.

use crate::SimError;
use comm_kernels::ProfileChoice;
use cost_model::{FabricPreset, WorkloadParameters};
use pipeline_scheduler::PolicyKind;
use std::path::Path;

/// Token range scanned for the compute/communication crossover and sweeps.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub min_tokens: u64,
    pub max_tokens: u64,
    pub samples: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_tokens: 1,
            max_tokens: 1 << 20,
            samples: 64,
        }
    }
}

impl SweepConfig {
    /// Checks that the range can be log-sampled.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.min_tokens == 0 || self.max_tokens <= self.min_tokens {
            return Err(SimError::ConfigError(format!(
                "sweep range must satisfy 0 < min_tokens < max_tokens, got [{}, {}]",
                self.min_tokens, self.max_tokens
            )));
        }
        if self.samples < 2 {
            return Err(SimError::ConfigError(format!(
                "sweep needs at least 2 samples, got {}",
                self.samples
            )));
        }
        Ok(())
    }
}

/// Configuration for one evaluation.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SimConfig {
    /// Fabric preset name; when set, replaces the workload's latency and bandwidth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fabric: Option<String>,
    /// Pipeline policy name: `"sequential"` or `"overlapped"`.
    #[serde(default = "default_policy")]
    pub policy: String,
    /// Halve every phase before scheduling (micro-batching).
    #[serde(default)]
    pub split: bool,
    /// Kernel profile for the timings: `"base"`, `"auto"`, `"ll"`, `"ht"`.
    #[serde(default = "default_profile")]
    pub profile: String,
    /// Workload and base fabric.
    #[serde(default)]
    pub workload: WorkloadParameters,
    /// Token range for sampled curves.
    #[serde(default)]
    pub sweep: SweepConfig,
}

fn default_policy() -> String {
    "overlapped".to_string()
}

fn default_profile() -> String {
    "base".to_string()
}

impl SimConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SimError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SimError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, SimError> {
        toml::from_str(toml_str)
            .map_err(|e| SimError::ConfigError(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, SimError> {
        toml::to_string_pretty(self)
            .map_err(|e| SimError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Parses the policy name.
    pub fn create_policy(&self) -> Result<PolicyKind, SimError> {
        Ok(self.policy.parse::<PolicyKind>()?)
    }

    /// Parses the kernel-profile choice.
    pub fn parse_profile(&self) -> Result<ProfileChoice, SimError> {
        Ok(self.profile.parse::<ProfileChoice>()?)
    }

    /// Parses the fabric preset, if one is configured.
    pub fn parse_fabric(&self) -> Result<Option<FabricPreset>, SimError> {
        self.fabric
            .as_deref()
            .map(|name| name.parse::<FabricPreset>().map_err(SimError::from))
            .transpose()
    }

    /// Returns the workload with the fabric preset applied, validated.
    pub fn resolve_workload(&self) -> Result<WorkloadParameters, SimError> {
        let params = match self.parse_fabric()? {
            Some(preset) => {
                tracing::info!("fabric preset '{preset}' ({})", preset.description());
                self.workload.with_preset(preset)
            }
            None => self.workload,
        };
        params.validate()?;
        Ok(params)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fabric: None,
            policy: default_policy(),
            split: false,
            profile: default_profile(),
            workload: WorkloadParameters::default(),
            sweep: SweepConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let c = SimConfig::default();
        assert_eq!(c.policy, "overlapped");
        assert_eq!(c.profile, "base");
        assert!(!c.split);
        assert_eq!(c.workload, WorkloadParameters::default());
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
fabric = "nvlink4"
policy = "sequential"
split = true
profile = "ht"

[workload]
token_count = 4096
expert_parallelism = 32

[sweep]
samples = 16
"#;
        let c = SimConfig::from_toml(toml).unwrap();
        assert_eq!(c.fabric.as_deref(), Some("nvlink4"));
        assert_eq!(c.create_policy().unwrap(), PolicyKind::Sequential);
        assert!(c.split);
        assert_eq!(c.parse_profile().unwrap(), ProfileChoice::HighThroughput);
        assert_eq!(c.workload.token_count, 4096);
        assert_eq!(c.workload.expert_parallelism, 32);
        // Unspecified fields keep the reference values.
        assert_eq!(c.workload.hidden_dimension, 6144);
        assert_eq!(c.sweep.samples, 16);
        assert_eq!(c.sweep.max_tokens, 1 << 20);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(SimConfig::from_toml("").unwrap(), SimConfig::default());
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let c = SimConfig {
            fabric: Some("ib-ndr".into()),
            ..Default::default()
        };
        let toml = c.to_toml().unwrap();
        let back = SimConfig::from_toml(&toml).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            SimConfig::from_toml("policy = ["),
            Err(SimError::ConfigError(_))
        ));
    }

    #[test]
    fn test_unknown_policy() {
        let c = SimConfig {
            policy: "bogus".into(),
            ..Default::default()
        };
        assert!(matches!(c.create_policy(), Err(SimError::SchedulerError(_))));
    }

    #[test]
    fn test_unknown_profile() {
        let c = SimConfig {
            profile: "turbo".into(),
            ..Default::default()
        };
        assert!(matches!(c.parse_profile(), Err(SimError::KernelError(_))));
    }

    #[test]
    fn test_resolve_workload_applies_preset() {
        let c = SimConfig {
            fabric: Some("nvlink5".into()),
            ..Default::default()
        };
        let p = c.resolve_workload().unwrap();
        assert_eq!(p.bandwidth_gbps, FabricPreset::NvLink5.bandwidth_gbps());
        assert_eq!(p.latency_us, FabricPreset::NvLink5.latency_us());
    }

    #[test]
    fn test_resolve_workload_rejects_unknown_preset() {
        let c = SimConfig {
            fabric: Some("carrier-pigeon".into()),
            ..Default::default()
        };
        assert!(matches!(c.resolve_workload(), Err(SimError::ModelError(_))));
    }

    #[test]
    fn test_resolve_workload_rejects_invalid() {
        let mut c = SimConfig::default();
        c.workload.expert_parallelism = 0;
        assert!(c.resolve_workload().is_err());
    }

    #[test]
    fn test_sweep_validate() {
        SweepConfig::default().validate().unwrap();
        let bad = SweepConfig {
            min_tokens: 0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = SweepConfig {
            samples: 1,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
