// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Closed-form and sampled crossover solvers.

use crate::CrossoverError;
use comm_kernels::KernelProfile;
use std::fmt;

/// Where two cost curves swap dominance.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum Crossover {
    /// The curves cross at this x (bytes or tokens, depending on the curve).
    #[serde(rename = "at")]
    At(f64),
    /// No finite, positive crossover exists: the curves coincide, run
    /// parallel, or one dominates the other over the whole domain.
    #[serde(rename = "none")]
    Never,
}

impl Crossover {
    /// The threshold, if one exists.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::At(x) => Some(*x),
            Self::Never => None,
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Self::Never)
    }

    /// Applies `f` to the threshold, keeping [`Never`](Self::Never) as is.
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Self::At(x) => Self::At(f(x)),
            Self::Never => Self::Never,
        }
    }
}

impl fmt::Display for Crossover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At(x) => write!(f, "{x:.1}"),
            Self::Never => f.write_str("none"),
        }
    }
}

/// A straight cost line `intercept_ms + slope_ms_per_unit · x`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct CostLine {
    pub intercept_ms: f64,
    pub slope_ms_per_unit: f64,
}

impl CostLine {
    /// The one-way cost line of a kernel profile over payload bytes.
    ///
    /// The round-trip factor of two scales both lines equally and does not
    /// move the crossing point.
    pub fn from_profile(profile: &KernelProfile) -> Self {
        Self {
            intercept_ms: profile.effective_latency_ms,
            slope_ms_per_unit: profile.ms_per_byte(),
        }
    }

    /// Exact crossing point with `other`.
    pub fn crossing(&self, other: &CostLine) -> Crossover {
        let denom = other.slope_ms_per_unit - self.slope_ms_per_unit;
        if denom == 0.0 {
            return Crossover::Never;
        }
        let x = (self.intercept_ms - other.intercept_ms) / denom;
        if x.is_finite() && x > 0.0 {
            Crossover::At(x)
        } else {
            Crossover::Never
        }
    }
}

/// Payload (bytes per rank) at which profile `a` and profile `b` cost the
/// same:
///
/// ```text
/// V* = (L_a − L_b) / (1/BW_b − 1/BW_a)
/// ```
///
/// Returns [`Crossover::Never`] for identical or parallel lines and when the
/// solution is not strictly positive (one profile dominates everywhere).
pub fn closed_form(a: &KernelProfile, b: &KernelProfile) -> Crossover {
    let result = CostLine::from_profile(a).crossing(&CostLine::from_profile(b));
    if result.is_never() {
        tracing::warn!(
            "no crossover between '{}' and '{}' profiles",
            a.name,
            b.name,
        );
    }
    result
}

/// One point of two sampled cost curves sharing an x-axis.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct CurveSample {
    /// Position on the x-axis (payload bytes or tokens); must be `> 0`.
    pub x: f64,
    /// Cost of the first curve at `x`.
    pub a: f64,
    /// Cost of the second curve at `x`.
    pub b: f64,
}

impl CurveSample {
    fn diff(&self) -> f64 {
        self.a - self.b
    }
}

/// Scans samples for the first change of dominance between `a` and `b`.
///
/// The crossing is interpolated linearly in `ln x` between the two samples
/// that bracket the sign flip of `a − b`. When samples with `a == b` sit
/// between opposite signs, the first such sample is the crossover. Curves
/// that only touch, or coincide everywhere, yield [`Crossover::Never`].
///
/// Samples must be at least two, strictly increasing in `x`, with `x > 0`
/// and finite costs.
pub fn sampled(samples: &[CurveSample]) -> Result<Crossover, CrossoverError> {
    validate_samples(samples)?;

    let mut last_signed: Option<&CurveSample> = None;
    let mut first_tie: Option<f64> = None;

    for s in samples {
        let d = s.diff();
        if d == 0.0 {
            first_tie.get_or_insert(s.x);
            continue;
        }

        if let Some(prev) = last_signed {
            let prev_d = prev.diff();
            if (prev_d > 0.0) != (d > 0.0) {
                if let Some(x) = first_tie {
                    return Ok(Crossover::At(x));
                }
                let t = prev_d / (prev_d - d);
                let (l0, l1) = (prev.x.ln(), s.x.ln());
                return Ok(Crossover::At((l0 + t * (l1 - l0)).exp()));
            }
        }

        last_signed = Some(s);
        first_tie = None;
    }

    Ok(Crossover::Never)
}

fn validate_samples(samples: &[CurveSample]) -> Result<(), CrossoverError> {
    if samples.len() < 2 {
        return Err(CrossoverError::InvalidSamples(format!(
            "need at least 2 samples, got {}",
            samples.len()
        )));
    }
    for (i, s) in samples.iter().enumerate() {
        if !(s.x.is_finite() && s.x > 0.0) {
            return Err(CrossoverError::InvalidSamples(format!(
                "sample {i}: x must be finite and > 0, got {}",
                s.x
            )));
        }
        if !(s.a.is_finite() && s.b.is_finite()) {
            return Err(CrossoverError::InvalidSamples(format!(
                "sample {i}: costs must be finite, got a={} b={}",
                s.a, s.b
            )));
        }
    }
    if let Some(w) = samples.windows(2).find(|w| w[1].x <= w[0].x) {
        return Err(CrossoverError::InvalidSamples(format!(
            "x must be strictly increasing ({} then {})",
            w[0].x, w[1].x
        )));
    }
    Ok(())
}

/// `count` points evenly spaced in log space from `min` to `max` inclusive.
pub fn log_spaced(min: f64, max: f64, count: usize) -> Result<Vec<f64>, CrossoverError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > min) {
        return Err(CrossoverError::InvalidSamples(format!(
            "log range must satisfy 0 < min < max, got [{min}, {max}]"
        )));
    }
    if count < 2 {
        return Err(CrossoverError::InvalidSamples(format!(
            "need at least 2 grid points, got {count}"
        )));
    }

    let (lo, hi) = (min.ln(), max.ln());
    let step = (hi - lo) / (count - 1) as f64;
    let mut grid: Vec<f64> = (0..count).map(|i| (lo + step * i as f64).exp()).collect();
    // Pin the endpoints against exp/ln rounding.
    grid[0] = min;
    grid[count - 1] = max;
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use comm_kernels::ProfileKind;

    fn sample(x: f64, a: f64, b: f64) -> CurveSample {
        CurveSample { x, a, b }
    }

    #[test]
    fn test_closed_form_reference() {
        let ll = KernelProfile::derive(ProfileKind::LowLatency, 25.0, 25.0).unwrap();
        let ht = KernelProfile::derive(ProfileKind::HighThroughput, 25.0, 25.0).unwrap();
        let v = closed_form(&ll, &ht).value().unwrap();
        // Both profiles cost the same at the crossing.
        let diff = ll.round_trip_ms(v) - ht.round_trip_ms(v);
        assert!(diff.abs() < 1e-12, "diff = {diff}");
        // And it is symmetric in argument order.
        assert_eq!(closed_form(&ht, &ll).value().unwrap(), v);
    }

    #[test]
    fn test_closed_form_identical_profiles() {
        let p = KernelProfile::derive(ProfileKind::LowLatency, 25.0, 25.0).unwrap();
        assert_eq!(closed_form(&p, &p), Crossover::Never);
    }

    #[test]
    fn test_closed_form_dominated() {
        // Higher latency and no more bandwidth: never better.
        let a = CostLine { intercept_ms: 1.0, slope_ms_per_unit: 2.0 };
        let b = CostLine { intercept_ms: 2.0, slope_ms_per_unit: 3.0 };
        assert_eq!(a.crossing(&b), Crossover::Never);
    }

    #[test]
    fn test_closed_form_equal_intercepts() {
        // Crossing at exactly zero is not a positive threshold.
        let a = CostLine { intercept_ms: 1.0, slope_ms_per_unit: 2.0 };
        let b = CostLine { intercept_ms: 1.0, slope_ms_per_unit: 1.0 };
        assert_eq!(a.crossing(&b), Crossover::Never);
    }

    #[test]
    fn test_sampled_interpolates_in_log_space() {
        // a − b goes from +1 to −1: midpoint in ln x is sqrt(10 * 1000) = 100.
        let s = [sample(10.0, 2.0, 1.0), sample(1000.0, 1.0, 2.0)];
        let x = sampled(&s).unwrap().value().unwrap();
        assert!((x - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_sampled_exact_tie() {
        let s = [
            sample(1.0, 2.0, 1.0),
            sample(2.0, 1.5, 1.5),
            sample(4.0, 1.0, 2.0),
        ];
        assert_eq!(sampled(&s).unwrap(), Crossover::At(2.0));
    }

    #[test]
    fn test_sampled_touch_is_not_a_crossing() {
        let s = [
            sample(1.0, 2.0, 1.0),
            sample(2.0, 1.5, 1.5),
            sample(4.0, 3.0, 2.0),
        ];
        assert_eq!(sampled(&s).unwrap(), Crossover::Never);
    }

    #[test]
    fn test_sampled_coinciding_curves() {
        let s: Vec<_> = (1..10).map(|i| sample(i as f64, 1.0, 1.0)).collect();
        assert_eq!(sampled(&s).unwrap(), Crossover::Never);
    }

    #[test]
    fn test_sampled_rejects_bad_input() {
        assert!(sampled(&[sample(1.0, 1.0, 2.0)]).is_err());
        assert!(sampled(&[sample(0.0, 1.0, 2.0), sample(1.0, 2.0, 1.0)]).is_err());
        assert!(sampled(&[sample(2.0, 1.0, 2.0), sample(1.0, 2.0, 1.0)]).is_err());
        assert!(sampled(&[sample(1.0, f64::NAN, 2.0), sample(2.0, 2.0, 1.0)]).is_err());
    }

    #[test]
    fn test_log_spaced() {
        let g = log_spaced(1.0, 1000.0, 4).unwrap();
        assert_eq!(g.len(), 4);
        assert_eq!(g[0], 1.0);
        assert_eq!(g[3], 1000.0);
        assert!((g[1] - 10.0).abs() < 1e-9);
        assert!((g[2] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_log_spaced_rejects_bad_range() {
        assert!(log_spaced(0.0, 10.0, 4).is_err());
        assert!(log_spaced(10.0, 10.0, 4).is_err());
        assert!(log_spaced(1.0, 10.0, 1).is_err());
    }

    #[test]
    fn test_crossover_json() {
        let at = serde_json::to_string(&Crossover::At(2.5)).unwrap();
        assert_eq!(at, r#"{"kind":"at","value":2.5}"#);
        let never = serde_json::to_string(&Crossover::Never).unwrap();
        assert_eq!(never, r#"{"kind":"none"}"#);
    }
}
