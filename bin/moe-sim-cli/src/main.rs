// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # moe-sim
//!
//! Command-line interface for the MoE expert-parallel latency model.
//!
//! ## Usage
//! ```bash
//! # Full report for the reference workload
//! moe-sim evaluate
//!
//! # Overlapped schedule on an NDR InfiniBand fabric, micro-batched
//! moe-sim schedule --fabric ib-ndr --tokens 8192 --split
//!
//! # LL vs HT kernels and the payload crossover, as JSON
//! moe-sim --json profiles --tokens 512
//!
//! # Token sweep from a config file
//! moe-sim --config moe.toml sweep --samples 24
//! ```

mod commands;

use clap::{Parser, Subcommand};
use commands::{RunArgs, WorkloadArgs};

#[derive(Parser)]
#[command(
    name = "moe-sim",
    about = "Latency model for expert-parallel MoE layers with dual-batch overlap",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file (flags override its values).
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print machine-readable JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one configuration: timings, kernel profiles, crossovers, schedule.
    Evaluate {
        #[command(flatten)]
        workload: WorkloadArgs,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Print the block table and an ASCII timeline for a pipeline policy.
    Schedule {
        #[command(flatten)]
        workload: WorkloadArgs,

        #[command(flatten)]
        run: RunArgs,

        /// Timeline width in characters.
        #[arg(long, default_value_t = 64)]
        width: usize,
    },

    /// Compare low-latency and high-throughput all-to-all kernels.
    Profiles {
        #[command(flatten)]
        workload: WorkloadArgs,
    },

    /// Sweep token counts on a log scale.
    Sweep {
        #[command(flatten)]
        workload: WorkloadArgs,

        /// Smallest token count.
        #[arg(long)]
        min_tokens: Option<u64>,

        /// Largest token count.
        #[arg(long)]
        max_tokens: Option<u64>,

        /// Number of log-spaced points.
        #[arg(long)]
        samples: Option<usize>,
    },

    /// List the built-in fabric presets.
    Presets,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Evaluate { workload, run } => {
            let mut config = commands::load_config(config_path, &workload)?;
            run.apply(&mut config);
            commands::evaluate::execute(config, cli.json)
        }
        Commands::Schedule {
            workload,
            run,
            width,
        } => {
            let mut config = commands::load_config(config_path, &workload)?;
            run.apply(&mut config);
            commands::schedule::execute(config, width, cli.json)
        }
        Commands::Profiles { workload } => {
            let config = commands::load_config(config_path, &workload)?;
            commands::profiles::execute(config, cli.json)
        }
        Commands::Sweep {
            workload,
            min_tokens,
            max_tokens,
            samples,
        } => {
            let mut config = commands::load_config(config_path, &workload)?;
            if let Some(v) = min_tokens {
                config.sweep.min_tokens = v;
            }
            if let Some(v) = max_tokens {
                config.sweep.max_tokens = v;
            }
            if let Some(v) = samples {
                config.sweep.samples = v;
            }
            commands::sweep::execute(config, cli.json)
        }
        Commands::Presets => commands::presets::execute(cli.json),
    }
}
