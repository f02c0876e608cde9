// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`SchedulePolicy`] trait and policy implementations.

pub mod overlapped;
pub mod sequential;

use crate::{PhaseDurations, Schedule, SchedulerError};
use std::fmt;
use std::str::FromStr;

/// Trait for pipeline policies.
///
/// A policy turns three phase durations into a timed [`Schedule`].
/// Policies are purely algorithmic (no I/O, no clocks), which keeps them
/// deterministic and trivially unit-testable.
pub trait SchedulePolicy: Send + Sync {
    /// Human-readable name of this policy.
    fn name(&self) -> &str;

    /// Produces a schedule for the given durations.
    fn schedule(&self, durations: PhaseDurations) -> Result<Schedule, SchedulerError>;
}

/// The built-in policies, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// One batch, phases strictly chained.
    Sequential,
    /// Two batches, dual-batch overlap.
    #[default]
    Overlapped,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 2] = [Self::Sequential, Self::Overlapped];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Overlapped => "overlapped",
        }
    }

    /// Creates the policy implementation.
    pub fn create(&self) -> Box<dyn SchedulePolicy> {
        match self {
            Self::Sequential => Box::new(crate::Sequential::new()),
            Self::Overlapped => Box::new(crate::DualBatchOverlap::new()),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequential" | "seq" => Ok(Self::Sequential),
            "overlapped" | "dbo" | "dual-batch-overlap" => Ok(Self::Overlapped),
            _ => Err(SchedulerError::UnknownPolicy(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("Sequential".parse::<PolicyKind>().unwrap(), PolicyKind::Sequential);
        assert_eq!("dbo".parse::<PolicyKind>().unwrap(), PolicyKind::Overlapped);
        assert!(matches!(
            "round-robin".parse::<PolicyKind>(),
            Err(SchedulerError::UnknownPolicy(_))
        ));
    }

    #[test]
    fn test_create_names() {
        for kind in PolicyKind::ALL {
            assert_eq!(kind.create().name(), kind.as_str());
        }
    }
}
