// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Round-trip costs and optimal-profile selection.

use crate::{KernelError, KernelProfile, ProfileKind};
use cost_model::WorkloadParameters;
use std::fmt;
use std::str::FromStr;

/// Dispatch + combine time of `payload_bytes_per_rank` under `profile`.
///
/// Each leg pays the profile's latency and bandwidth term independently.
pub fn round_trip_ms(payload_bytes_per_rank: f64, profile: &KernelProfile) -> f64 {
    profile.round_trip_ms(payload_bytes_per_rank)
}

/// Communication cost of one workload under one profile.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ProfileCost {
    pub profile: KernelProfile,
    pub payload_bytes: f64,
    pub dispatch_ms: f64,
    pub combine_ms: f64,
    pub round_trip_ms: f64,
}

impl ProfileCost {
    fn new(profile: KernelProfile, payload_bytes: f64) -> Self {
        let leg = profile.one_way_ms(payload_bytes);
        Self {
            profile,
            payload_bytes,
            dispatch_ms: leg,
            combine_ms: leg,
            round_trip_ms: profile.round_trip_ms(payload_bytes),
        }
    }
}

/// Side-by-side LL/HT costs for the same payload.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ProfileComparison {
    pub ll: ProfileCost,
    pub ht: ProfileCost,
    pub optimal: ProfileKind,
}

impl ProfileComparison {
    /// Cost of the given profile.
    pub fn cost(&self, kind: ProfileKind) -> &ProfileCost {
        match kind {
            ProfileKind::LowLatency => &self.ll,
            ProfileKind::HighThroughput => &self.ht,
        }
    }

    /// Cost of the winning profile.
    pub fn optimal_cost(&self) -> &ProfileCost {
        self.cost(self.optimal)
    }

    /// Round-trip time saved by the winner over the loser (`>= 0`).
    pub fn savings_ms(&self) -> f64 {
        (self.ll.round_trip_ms - self.ht.round_trip_ms).abs()
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        format!(
            "LL {:.4}ms vs HT {:.4}ms round trip @ {:.0} B/rank → {} (saves {:.4}ms)",
            self.ll.round_trip_ms,
            self.ht.round_trip_ms,
            self.ll.payload_bytes,
            self.optimal,
            self.savings_ms(),
        )
    }
}

/// Evaluates both profiles for the workload's per-rank payload.
///
/// The formula is applied literally, so a zero-token workload still pays
/// each profile's latency; this keeps the LL/HT curves continuous at the
/// origin for plotting.
pub fn evaluate_kernel_profiles(
    params: WorkloadParameters,
) -> Result<ProfileComparison, KernelError> {
    params.validate()?;
    let payload = params.payload_bytes_per_rank();

    let ll = ProfileCost::new(
        KernelProfile::for_workload(ProfileKind::LowLatency, &params)?,
        payload,
    );
    let ht = ProfileCost::new(
        KernelProfile::for_workload(ProfileKind::HighThroughput, &params)?,
        payload,
    );

    for cost in [&ll, &ht] {
        if !cost.round_trip_ms.is_finite() {
            return Err(cost_model::ModelError::non_finite("round_trip_ms", cost.round_trip_ms).into());
        }
    }

    // Ties go to LL.
    let optimal = if ht.round_trip_ms < ll.round_trip_ms {
        ProfileKind::HighThroughput
    } else {
        ProfileKind::LowLatency
    };

    tracing::debug!(
        payload_bytes = payload,
        ll_ms = ll.round_trip_ms,
        ht_ms = ht.round_trip_ms,
        "optimal kernel profile: {optimal}",
    );

    Ok(ProfileComparison { ll, ht, optimal })
}

/// Returns the cheaper profile for the workload's payload (LL on ties).
pub fn pick_optimal(params: WorkloadParameters) -> Result<ProfileKind, KernelError> {
    Ok(evaluate_kernel_profiles(params)?.optimal)
}

/// Which fabric a model evaluation should use.
///
/// This is a plain value chosen by the caller, so a forced profile and the
/// auto-picked one can always be evaluated side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum ProfileChoice {
    /// Use the workload's fabric as given.
    #[default]
    #[serde(rename = "base")]
    Base,
    /// Use whichever profile [`pick_optimal`] selects.
    #[serde(rename = "auto")]
    Auto,
    /// Force the low-latency profile.
    #[serde(rename = "ll")]
    LowLatency,
    /// Force the high-throughput profile.
    #[serde(rename = "ht")]
    HighThroughput,
}

impl ProfileChoice {
    /// Resolves the choice to a concrete profile, or `None` for [`Base`](Self::Base).
    pub fn resolve(&self, params: WorkloadParameters) -> Result<Option<ProfileKind>, KernelError> {
        match self {
            Self::Base => Ok(None),
            Self::Auto => pick_optimal(params).map(Some),
            Self::LowLatency => Ok(Some(ProfileKind::LowLatency)),
            Self::HighThroughput => Ok(Some(ProfileKind::HighThroughput)),
        }
    }

    /// Returns `params` with its fabric replaced by the resolved profile's
    /// effective fabric, together with the profile that was applied.
    pub fn apply(
        &self,
        params: WorkloadParameters,
    ) -> Result<(WorkloadParameters, Option<ProfileKind>), KernelError> {
        let Some(kind) = self.resolve(params)? else {
            return Ok((params, None));
        };
        let (latency_us, bandwidth_gbps) =
            kind.effective_fabric(params.latency_us, params.bandwidth_gbps);
        Ok((params.with_fabric(latency_us, bandwidth_gbps), Some(kind)))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Auto => "auto",
            Self::LowLatency => "ll",
            Self::HighThroughput => "ht",
        }
    }
}

impl fmt::Display for ProfileChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileChoice {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "base" | "none" => Ok(Self::Base),
            "auto" => Ok(Self::Auto),
            other => match other.parse::<ProfileKind>() {
                Ok(ProfileKind::LowLatency) => Ok(Self::LowLatency),
                Ok(ProfileKind::HighThroughput) => Ok(Self::HighThroughput),
                Err(_) => Err(KernelError::UnknownProfile(s.to_string())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(tokens: u64) -> WorkloadParameters {
        WorkloadParameters::default().with_tokens(tokens)
    }

    #[test]
    fn test_small_payload_prefers_ll() {
        assert_eq!(pick_optimal(params(1)).unwrap(), ProfileKind::LowLatency);
    }

    #[test]
    fn test_large_payload_prefers_ht() {
        assert_eq!(
            pick_optimal(params(1 << 20)).unwrap(),
            ProfileKind::HighThroughput
        );
    }

    #[test]
    fn test_tie_goes_to_ll() {
        // Zero latency and zero payload: both round trips are exactly 0.
        let p = params(0).with_fabric(0.0, 25.0);
        let cmp = evaluate_kernel_profiles(p).unwrap();
        assert_eq!(cmp.ll.round_trip_ms, cmp.ht.round_trip_ms);
        assert_eq!(cmp.optimal, ProfileKind::LowLatency);
        assert_eq!(cmp.savings_ms(), 0.0);
    }

    #[test]
    fn test_deterministic() {
        let p = params(3000);
        let a = evaluate_kernel_profiles(p).unwrap();
        let b = evaluate_kernel_profiles(p).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_cost_legs() {
        let cmp = evaluate_kernel_profiles(params(2048)).unwrap();
        assert_eq!(cmp.ht.dispatch_ms, cmp.ht.combine_ms);
        assert_eq!(cmp.ht.round_trip_ms, cmp.ht.dispatch_ms * 2.0);
        assert_eq!(
            round_trip_ms(cmp.ll.payload_bytes, &cmp.ll.profile),
            cmp.ll.round_trip_ms
        );
        assert_eq!(cmp.optimal_cost().round_trip_ms, cmp.cost(cmp.optimal).round_trip_ms);
    }

    #[test]
    fn test_invalid_workload_rejected() {
        let p = params(10).with_fabric(25.0, -1.0);
        assert!(matches!(
            evaluate_kernel_profiles(p),
            Err(KernelError::Model(_))
        ));
    }

    #[test]
    fn test_choice_base_is_identity() {
        let p = params(512);
        let (applied, kind) = ProfileChoice::Base.apply(p).unwrap();
        assert_eq!(applied, p);
        assert_eq!(kind, None);
    }

    #[test]
    fn test_choice_forced() {
        let p = params(1 << 20);
        let (applied, kind) = ProfileChoice::LowLatency.apply(p).unwrap();
        assert_eq!(kind, Some(ProfileKind::LowLatency));
        assert!((applied.latency_us - 25.0 * 0.55).abs() < 1e-12);
        assert!((applied.bandwidth_gbps - 25.0 * 0.70).abs() < 1e-12);
    }

    #[test]
    fn test_choice_auto_follows_pick() {
        for tokens in [1, 64, 4096, 1 << 20] {
            let p = params(tokens);
            let expected = pick_optimal(p).unwrap();
            assert_eq!(ProfileChoice::Auto.resolve(p).unwrap(), Some(expected));
        }
    }

    #[test]
    fn test_choice_parse() {
        assert_eq!("AUTO".parse::<ProfileChoice>().unwrap(), ProfileChoice::Auto);
        assert_eq!("ht".parse::<ProfileChoice>().unwrap(), ProfileChoice::HighThroughput);
        assert_eq!("base".parse::<ProfileChoice>().unwrap(), ProfileChoice::Base);
        assert!("maybe".parse::<ProfileChoice>().is_err());
    }

    #[test]
    fn test_summary() {
        let s = evaluate_kernel_profiles(params(1)).unwrap().summary();
        assert!(s.contains("→ ll"));
    }
}
