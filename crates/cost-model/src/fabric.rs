// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Named interconnect presets.
//!
//! Figures are *effective* all-to-all numbers per rank (kernel launch and
//! protocol overhead folded into the latency, achievable rather than
//! peak bandwidth), which is what the dispatch/combine formulas expect.

use crate::ModelError;
use std::fmt;
use std::str::FromStr;

/// A named `(latency, bandwidth)` pair for a common interconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FabricPreset {
    /// PCIe 4.0 x16 peer-to-peer.
    Pcie4,
    /// PCIe 5.0 x16 peer-to-peer.
    Pcie5,
    /// NVLink 3.0 (A100 class).
    NvLink3,
    /// NVLink 4.0 (H100 class).
    NvLink4,
    /// NVLink 5.0 (B200 class).
    NvLink5,
    /// InfiniBand HDR, 200 Gb/s per rank.
    IbHdr,
    /// InfiniBand NDR, 400 Gb/s per rank.
    IbNdr,
    /// RoCE v2 over 100 GbE.
    Roce100g,
    /// RoCE v2 over 400 GbE.
    Roce400g,
}

impl FabricPreset {
    /// Every preset, in display order.
    pub const ALL: [FabricPreset; 9] = [
        Self::Pcie4,
        Self::Pcie5,
        Self::NvLink3,
        Self::NvLink4,
        Self::NvLink5,
        Self::IbHdr,
        Self::IbNdr,
        Self::Roce100g,
        Self::Roce400g,
    ];

    /// Short machine name, as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pcie4 => "pcie4",
            Self::Pcie5 => "pcie5",
            Self::NvLink3 => "nvlink3",
            Self::NvLink4 => "nvlink4",
            Self::NvLink5 => "nvlink5",
            Self::IbHdr => "ib-hdr",
            Self::IbNdr => "ib-ndr",
            Self::Roce100g => "roce-100g",
            Self::Roce400g => "roce-400g",
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Pcie4 => "PCIe 4.0 x16 (P2P)",
            Self::Pcie5 => "PCIe 5.0 x16 (P2P)",
            Self::NvLink3 => "NVLink 3.0 (A100)",
            Self::NvLink4 => "NVLink 4.0 (H100)",
            Self::NvLink5 => "NVLink 5.0 (B200)",
            Self::IbHdr => "InfiniBand HDR 200 Gb/s",
            Self::IbNdr => "InfiniBand NDR 400 Gb/s",
            Self::Roce100g => "RoCE v2 100 GbE",
            Self::Roce400g => "RoCE v2 400 GbE",
        }
    }

    /// Effective per-transfer latency in microseconds.
    pub fn latency_us(&self) -> f64 {
        match self {
            Self::Pcie4 => 25.0,
            Self::Pcie5 => 18.0,
            Self::NvLink3 => 6.0,
            Self::NvLink4 => 4.0,
            Self::NvLink5 => 3.0,
            Self::IbHdr => 25.0,
            Self::IbNdr => 18.0,
            Self::Roce100g => 30.0,
            Self::Roce400g => 22.0,
        }
    }

    /// Effective per-rank bandwidth in GB/s.
    pub fn bandwidth_gbps(&self) -> f64 {
        match self {
            Self::Pcie4 => 18.0,
            Self::Pcie5 => 28.0,
            Self::NvLink3 => 150.0,
            Self::NvLink4 => 225.0,
            Self::NvLink5 => 450.0,
            Self::IbHdr => 25.0,
            Self::IbNdr => 50.0,
            Self::Roce100g => 11.0,
            Self::Roce400g => 45.0,
        }
    }
}

impl fmt::Display for FabricPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FabricPreset {
    type Err = ModelError;

    /// Parses a preset name case-insensitively; `_` and `-` are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('_', "-");
        match key.as_str() {
            "pcie4" => Ok(Self::Pcie4),
            "pcie5" => Ok(Self::Pcie5),
            "nvlink3" | "nvlink" => Ok(Self::NvLink3),
            "nvlink4" => Ok(Self::NvLink4),
            "nvlink5" => Ok(Self::NvLink5),
            "ib-hdr" | "hdr" => Ok(Self::IbHdr),
            "ib-ndr" | "ndr" => Ok(Self::IbNdr),
            "roce-100g" | "roce100g" => Ok(Self::Roce100g),
            "roce-400g" | "roce400g" => Ok(Self::Roce400g),
            _ => {
                let known: Vec<&str> = Self::ALL.iter().map(|p| p.as_str()).collect();
                Err(ModelError::invalid(
                    "fabric",
                    format!("unknown preset '{s}'; expected one of {}", known.join(", ")),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for p in FabricPreset::ALL {
            assert_eq!(p.as_str().parse::<FabricPreset>().unwrap(), p);
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("IB_NDR".parse::<FabricPreset>().unwrap(), FabricPreset::IbNdr);
        assert_eq!(" NVLink4 ".parse::<FabricPreset>().unwrap(), FabricPreset::NvLink4);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "token-ring".parse::<FabricPreset>().unwrap_err();
        assert_eq!(err.parameter(), "fabric");
        assert!(err.to_string().contains("token-ring"));
    }

    #[test]
    fn test_presets_are_valid_fabrics() {
        for p in FabricPreset::ALL {
            let params = crate::WorkloadParameters::default().with_preset(p);
            params.validate().unwrap();
        }
    }
}
