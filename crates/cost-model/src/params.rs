// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Workload and fabric parameters for a single model evaluation.

use crate::{FabricPreset, ModelError};

/// Immutable input snapshot for one evaluation of the cost model.
///
/// All fields are plain numbers so the struct is `Copy` and is passed by
/// value into every model call. Construct it with struct-update syntax over
/// [`WorkloadParameters::default`] (the reference scenario) or with the
/// `with_*` helpers, then call [`validate`](Self::validate) or go straight
/// through [`crate::evaluate`], which validates for you.
///
/// # TOML
/// Every field is optional when deserialising; missing fields fall back to
/// the reference scenario.
/// ```toml
/// token_count = 4096
/// expert_parallelism = 32
/// load_imbalance_skew = 0.25
/// ```
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WorkloadParameters {
    /// Tokens processed per step.
    pub token_count: u64,
    /// Number of ranks sharing expert compute and the fabric (`P`).
    pub expert_parallelism: u32,
    /// Experts activated per token.
    pub top_k: u32,
    /// Model hidden dimension.
    pub hidden_dimension: u32,
    /// Bytes per activation element (fractional for sub-byte formats).
    pub bytes_per_element: f64,
    /// Expert compute cost per routed token in microseconds.
    pub compute_us_per_token: f64,
    /// Routing imbalance in `[0, 1]`; inflates the slowest rank's load.
    pub load_imbalance_skew: f64,
    /// Fixed per-transfer latency of the fabric in microseconds.
    pub latency_us: f64,
    /// Sustained fabric bandwidth per rank in GB/s (1 GB = 1e9 bytes).
    pub bandwidth_gbps: f64,
}

impl Default for WorkloadParameters {
    fn default() -> Self {
        Self {
            token_count: 1024,
            expert_parallelism: 16,
            top_k: 2,
            hidden_dimension: 6144,
            bytes_per_element: 2.0,
            compute_us_per_token: 0.45,
            load_imbalance_skew: 0.10,
            latency_us: 25.0,
            bandwidth_gbps: 25.0,
        }
    }
}

impl WorkloadParameters {
    /// Returns a copy with a different token count.
    pub fn with_tokens(self, token_count: u64) -> Self {
        Self {
            token_count,
            ..self
        }
    }

    /// Returns a copy with a different expert-parallel group size.
    pub fn with_expert_parallelism(self, expert_parallelism: u32) -> Self {
        Self {
            expert_parallelism,
            ..self
        }
    }

    /// Returns a copy with a different routing skew.
    pub fn with_skew(self, load_imbalance_skew: f64) -> Self {
        Self {
            load_imbalance_skew,
            ..self
        }
    }

    /// Returns a copy with the fabric replaced by `(latency_us, bandwidth_gbps)`.
    pub fn with_fabric(self, latency_us: f64, bandwidth_gbps: f64) -> Self {
        Self {
            latency_us,
            bandwidth_gbps,
            ..self
        }
    }

    /// Returns a copy using the latency and bandwidth of a named preset.
    pub fn with_preset(self, preset: FabricPreset) -> Self {
        self.with_fabric(preset.latency_us(), preset.bandwidth_gbps())
    }

    /// Bytes each rank sends in one all-to-all leg.
    pub fn payload_bytes_per_rank(&self) -> f64 {
        crate::phase::payload_bytes_per_rank(
            self.token_count,
            self.top_k,
            self.hidden_dimension,
            self.bytes_per_element,
            self.expert_parallelism,
        )
    }

    /// Bytes one token contributes to a single all-to-all leg, before
    /// division across ranks.
    pub fn bytes_per_token(&self) -> f64 {
        self.top_k as f64 * self.hidden_dimension as f64 * self.bytes_per_element
    }

    /// Checks every field against its documented domain.
    ///
    /// Values are never clamped: the first violation is returned as
    /// [`ModelError::InvalidParameter`].
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.expert_parallelism < 1 {
            return Err(ModelError::invalid(
                "expert_parallelism",
                format!("must be at least 1, got {}", self.expert_parallelism),
            ));
        }
        if self.top_k < 1 {
            return Err(ModelError::invalid(
                "top_k",
                format!("must be at least 1, got {}", self.top_k),
            ));
        }
        if self.hidden_dimension < 1 {
            return Err(ModelError::invalid(
                "hidden_dimension",
                format!("must be at least 1, got {}", self.hidden_dimension),
            ));
        }
        if !(self.bytes_per_element.is_finite() && self.bytes_per_element > 0.0) {
            return Err(ModelError::invalid(
                "bytes_per_element",
                format!("must be finite and > 0, got {}", self.bytes_per_element),
            ));
        }
        if !(self.compute_us_per_token.is_finite() && self.compute_us_per_token >= 0.0) {
            return Err(ModelError::invalid(
                "compute_us_per_token",
                format!("must be finite and >= 0, got {}", self.compute_us_per_token),
            ));
        }
        if !(0.0..=1.0).contains(&self.load_imbalance_skew) {
            return Err(ModelError::invalid(
                "load_imbalance_skew",
                format!("must lie in [0, 1], got {}", self.load_imbalance_skew),
            ));
        }
        if self.load_imbalance_skew == 1.0 {
            tracing::warn!("load_imbalance_skew = 1.0, modelling the worst-case straggler");
        }
        if !(self.latency_us.is_finite() && self.latency_us >= 0.0) {
            return Err(ModelError::invalid(
                "latency_us",
                format!("must be finite and >= 0, got {}", self.latency_us),
            ));
        }
        if !(self.bandwidth_gbps.is_finite() && self.bandwidth_gbps > 0.0) {
            return Err(ModelError::invalid(
                "bandwidth_gbps",
                format!("must be finite and > 0, got {}", self.bandwidth_gbps),
            ));
        }
        Ok(())
    }

    /// Returns a one-line description for logs and CLI headers.
    pub fn summary(&self) -> String {
        format!(
            "{} tokens, P={}, top-{}, hidden {}, {} B/elem, {:.3} us/token, skew {:.2}, \
             fabric {:.1} us / {:.1} GB/s",
            self.token_count,
            self.expert_parallelism,
            self.top_k,
            self.hidden_dimension,
            self.bytes_per_element,
            self.compute_us_per_token,
            self.load_imbalance_skew,
            self.latency_us,
            self.bandwidth_gbps,
        )
    }
}
