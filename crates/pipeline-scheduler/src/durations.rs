// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Phase durations fed into a policy.

use crate::{Phase, SchedulerError};
use cost_model::Timings;

/// The three phase durations a policy schedules, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PhaseDurations {
    pub dispatch_ms: f64,
    pub compute_ms: f64,
    pub combine_ms: f64,
}

impl PhaseDurations {
    /// Creates validated durations.
    pub fn new(dispatch_ms: f64, compute_ms: f64, combine_ms: f64) -> Result<Self, SchedulerError> {
        let d = Self {
            dispatch_ms,
            compute_ms,
            combine_ms,
        };
        d.validate()?;
        Ok(d)
    }

    /// Takes the phase durations of an analytic [`Timings`] record.
    pub fn from_timings(timings: &Timings) -> Result<Self, SchedulerError> {
        let d = Self::new(timings.dispatch_ms, timings.compute_ms, timings.combine_ms)?;
        if d.combine_ms != d.dispatch_ms {
            tracing::warn!(
                dispatch_ms = d.dispatch_ms,
                combine_ms = d.combine_ms,
                "asymmetric all-to-all legs; scheduling as given",
            );
        }
        Ok(d)
    }

    /// Every duration halved (one micro-batch of a split step).
    pub fn halved(&self) -> Self {
        Self {
            dispatch_ms: self.dispatch_ms / 2.0,
            compute_ms: self.compute_ms / 2.0,
            combine_ms: self.combine_ms / 2.0,
        }
    }

    /// Duration of `phase`.
    pub fn of(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Dispatch => self.dispatch_ms,
            Phase::Compute => self.compute_ms,
            Phase::Combine => self.combine_ms,
        }
    }

    /// Sum of the three phases (one batch, no overlap).
    pub fn total_ms(&self) -> f64 {
        self.dispatch_ms + self.compute_ms + self.combine_ms
    }

    /// Rejects negative or non-finite durations.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        for phase in Phase::ALL {
            let value = self.of(phase);
            if !(value.is_finite() && value >= 0.0) {
                return Err(SchedulerError::InvalidDuration { phase, value });
            }
        }
        Ok(())
    }
}
