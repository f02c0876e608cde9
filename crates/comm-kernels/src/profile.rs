// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Kernel profile definitions.

use crate::KernelError;
use cost_model::phase::{transfer_time_ms, US_PER_MS};
use cost_model::{ModelError, WorkloadParameters};
use std::fmt;
use std::str::FromStr;

/// The two communication-kernel presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ProfileKind {
    /// Cuts fixed overhead at the cost of sustained throughput.
    #[serde(rename = "ll")]
    LowLatency,
    /// Higher setup cost, materially larger effective bandwidth
    /// (hierarchical / forwarded transfer paths).
    #[serde(rename = "ht")]
    HighThroughput,
}

impl ProfileKind {
    /// Both profiles, LL first (the tie-break winner).
    pub const ALL: [ProfileKind; 2] = [Self::LowLatency, Self::HighThroughput];

    /// Short name: `"ll"` or `"ht"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LowLatency => "ll",
            Self::HighThroughput => "ht",
        }
    }

    /// Long name: `"low-latency"` or `"high-throughput"`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LowLatency => "low-latency",
            Self::HighThroughput => "high-throughput",
        }
    }

    /// Multiplier applied to the base latency.
    pub fn latency_multiplier(&self) -> f64 {
        match self {
            Self::LowLatency => 0.55,
            Self::HighThroughput => 1.15,
        }
    }

    /// Multiplier applied to the base bandwidth.
    pub fn bandwidth_multiplier(&self) -> f64 {
        match self {
            Self::LowLatency => 0.70,
            Self::HighThroughput => 1.35,
        }
    }

    /// Maps a base fabric `(latency_us, bandwidth_gbps)` to this profile's
    /// effective fabric in the same units.
    pub fn effective_fabric(&self, latency_us: f64, bandwidth_gbps: f64) -> (f64, f64) {
        (
            latency_us * self.latency_multiplier(),
            bandwidth_gbps * self.bandwidth_multiplier(),
        )
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileKind {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ll" | "low-latency" | "low_latency" => Ok(Self::LowLatency),
            "ht" | "high-throughput" | "high_throughput" => Ok(Self::HighThroughput),
            _ => Err(KernelError::UnknownProfile(s.to_string())),
        }
    }
}

/// A profile's effective fabric, derived once from a base fabric.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct KernelProfile {
    pub kind: ProfileKind,
    pub name: &'static str,
    pub effective_latency_ms: f64,
    pub effective_bandwidth_gbps: f64,
}

impl KernelProfile {
    /// Derives `kind` from a base latency (µs) and bandwidth (GB/s).
    pub fn derive(
        kind: ProfileKind,
        base_latency_us: f64,
        base_bandwidth_gbps: f64,
    ) -> Result<Self, KernelError> {
        if !(base_latency_us.is_finite() && base_latency_us >= 0.0) {
            return Err(ModelError::invalid(
                "latency_us",
                format!("must be finite and >= 0, got {base_latency_us}"),
            )
            .into());
        }
        if !(base_bandwidth_gbps.is_finite() && base_bandwidth_gbps > 0.0) {
            return Err(ModelError::invalid(
                "bandwidth_gbps",
                format!("must be finite and > 0, got {base_bandwidth_gbps}"),
            )
            .into());
        }

        let (latency_us, bandwidth_gbps) =
            kind.effective_fabric(base_latency_us, base_bandwidth_gbps);
        Ok(Self {
            kind,
            name: kind.name(),
            effective_latency_ms: latency_us / US_PER_MS,
            effective_bandwidth_gbps: bandwidth_gbps,
        })
    }

    /// Derives `kind` from the fabric of a workload.
    pub fn for_workload(kind: ProfileKind, params: &WorkloadParameters) -> Result<Self, KernelError> {
        Self::derive(kind, params.latency_us, params.bandwidth_gbps)
    }

    /// Time of one all-to-all leg carrying `payload_bytes` per rank.
    pub fn one_way_ms(&self, payload_bytes: f64) -> f64 {
        transfer_time_ms(
            self.effective_latency_ms,
            self.effective_bandwidth_gbps,
            payload_bytes,
        )
    }

    /// Time of a dispatch leg plus a combine leg.
    pub fn round_trip_ms(&self, payload_bytes: f64) -> f64 {
        2.0 * self.one_way_ms(payload_bytes)
    }

    /// Inverse bandwidth in milliseconds per byte (the slope of the cost line).
    pub fn ms_per_byte(&self) -> f64 {
        US_PER_MS / (self.effective_bandwidth_gbps * cost_model::phase::BYTES_PER_GB)
    }
}
