// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and the flags they share.

pub mod evaluate;
pub mod presets;
pub mod profiles;
pub mod schedule;
pub mod sweep;

use anyhow::Context;
use crossover::Crossover;
use simulator::SimConfig;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Workload overrides shared by every model subcommand.
#[derive(clap::Args, Debug, Default)]
pub struct WorkloadArgs {
    /// Tokens routed in one step.
    #[arg(short, long)]
    pub tokens: Option<u64>,

    /// Number of ranks holding experts.
    #[arg(short = 'p', long)]
    pub expert_parallelism: Option<u32>,

    /// Experts each token is routed to.
    #[arg(short = 'k', long)]
    pub top_k: Option<u32>,

    /// Hidden dimension of a token activation.
    #[arg(long)]
    pub hidden: Option<u32>,

    /// Bytes per activation element (2 for bf16).
    #[arg(long)]
    pub bytes_per_element: Option<f64>,

    /// Expert compute cost per routed token, in microseconds.
    #[arg(long)]
    pub us_per_token: Option<f64>,

    /// Load-imbalance skew in [0, 1].
    #[arg(short, long)]
    pub skew: Option<f64>,

    /// Base fabric latency in microseconds.
    #[arg(long)]
    pub latency_us: Option<f64>,

    /// Base fabric bandwidth in GB/s.
    #[arg(long)]
    pub bandwidth_gbps: Option<f64>,

    /// Fabric preset (see `moe-sim presets`).
    #[arg(short, long)]
    pub fabric: Option<String>,

    /// Kernel profile for the timings: base, auto, ll, ht.
    #[arg(long)]
    pub profile: Option<String>,
}

impl WorkloadArgs {
    /// Writes every flag that was given over `config`.
    ///
    /// Explicit latency or bandwidth drops a preset inherited from the file.
    pub fn apply(&self, config: &mut SimConfig) {
        let w = &mut config.workload;
        if let Some(v) = self.tokens {
            w.token_count = v;
        }
        if let Some(v) = self.expert_parallelism {
            w.expert_parallelism = v;
        }
        if let Some(v) = self.top_k {
            w.top_k = v;
        }
        if let Some(v) = self.hidden {
            w.hidden_dimension = v;
        }
        if let Some(v) = self.bytes_per_element {
            w.bytes_per_element = v;
        }
        if let Some(v) = self.us_per_token {
            w.compute_us_per_token = v;
        }
        if let Some(v) = self.skew {
            w.load_imbalance_skew = v;
        }
        if let Some(v) = self.latency_us {
            w.latency_us = v;
        }
        if let Some(v) = self.bandwidth_gbps {
            w.bandwidth_gbps = v;
        }

        if self.fabric.is_some() {
            config.fabric = self.fabric.clone();
        } else if self.latency_us.is_some() || self.bandwidth_gbps.is_some() {
            config.fabric = None;
        }
        if let Some(p) = &self.profile {
            config.profile = p.clone();
        }
    }
}

/// Pipeline flags for subcommands that build a schedule.
#[derive(clap::Args, Debug, Default)]
pub struct RunArgs {
    /// Pipeline policy: sequential or overlapped.
    #[arg(long)]
    pub policy: Option<String>,

    /// Halve every phase before scheduling.
    #[arg(long)]
    pub split: bool,
}

impl RunArgs {
    pub fn apply(&self, config: &mut SimConfig) {
        if let Some(p) = &self.policy {
            config.policy = p.clone();
        }
        if self.split {
            config.split = true;
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the base configuration (file or defaults) and applies `args`.
pub fn load_config(path: Option<&Path>, args: &WorkloadArgs) -> anyhow::Result<SimConfig> {
    let mut config = match path {
        Some(p) => SimConfig::from_file(p)
            .with_context(|| format!("failed to load config from '{}'", p.display()))?,
        None => SimConfig::default(),
    };
    args.apply(&mut config);
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

pub fn print_header(title: &str) {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║{:^54}║", format!("moe-sim · {title}"));
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Human-readable byte count.
pub fn format_bytes(bytes: f64) -> String {
    const KB: f64 = 1024.0;
    if bytes >= KB * KB * KB {
        format!("{:.2} GB", bytes / (KB * KB * KB))
    } else if bytes >= KB * KB {
        format!("{:.2} MB", bytes / (KB * KB))
    } else if bytes >= KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{bytes:.0} B")
    }
}

/// Renders a crossover with `unit` applied to the threshold.
pub fn format_crossover(c: Crossover, unit: impl Fn(f64) -> String) -> String {
    match c.value() {
        Some(v) => unit(v),
        None => "none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workload_args_override() {
        let args = WorkloadArgs {
            tokens: Some(4096),
            skew: Some(0.5),
            profile: Some("auto".into()),
            ..Default::default()
        };
        let mut config = SimConfig::default();
        args.apply(&mut config);
        assert_eq!(config.workload.token_count, 4096);
        assert_eq!(config.workload.load_imbalance_skew, 0.5);
        assert_eq!(config.profile, "auto");
        assert_eq!(config.workload.hidden_dimension, 6144);
    }

    #[test]
    fn test_explicit_fabric_numbers_drop_preset() {
        let mut config = SimConfig {
            fabric: Some("nvlink4".into()),
            ..Default::default()
        };
        let args = WorkloadArgs {
            bandwidth_gbps: Some(10.0),
            ..Default::default()
        };
        args.apply(&mut config);
        assert_eq!(config.fabric, None);
        assert_eq!(config.workload.bandwidth_gbps, 10.0);
    }

    #[test]
    fn test_run_args() {
        let mut config = SimConfig::default();
        RunArgs {
            policy: Some("sequential".into()),
            split: true,
        }
        .apply(&mut config);
        assert_eq!(config.policy, "sequential");
        assert!(config.split);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512.0), "512 B");
        assert_eq!(format_bytes(2048.0), "2.0 KB");
        assert_eq!(format_bytes(3.0 * 1024.0 * 1024.0), "3.00 MB");
    }

    #[test]
    fn test_format_crossover() {
        assert_eq!(format_crossover(Crossover::Never, format_bytes), "none");
        assert_eq!(format_crossover(Crossover::At(1024.0), format_bytes), "1.0 KB");
    }
}
