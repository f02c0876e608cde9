// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `moe-sim sweep` command: timings across log-spaced token counts.

use super::{format_crossover, print_header, print_json};
use crossover::Crossover;
use simulator::{Evaluator, SimConfig, SweepPoint};

#[derive(serde::Serialize)]
struct SweepReport {
    points: Vec<SweepPoint>,
    compute_comm_crossover_tokens: Crossover,
}

pub fn execute(config: SimConfig, json: bool) -> anyhow::Result<()> {
    let sweep = config.sweep;
    let evaluator = Evaluator::new(config);
    let points = evaluator.sweep()?;

    let (effective, _) = evaluator
        .config()
        .parse_profile()?
        .apply(evaluator.config().resolve_workload()?)?;
    let compute_comm_crossover_tokens = crossover::compute_comm_crossover(
        effective,
        sweep.min_tokens,
        sweep.max_tokens,
        sweep.samples,
    )?;

    if json {
        return print_json(&SweepReport {
            points,
            compute_comm_crossover_tokens,
        });
    }

    print_header("Token Sweep");
    println!(
        "  Range: {} .. {} tokens, {} points",
        sweep.min_tokens,
        sweep.max_tokens,
        points.len(),
    );
    println!();

    println!(
        "  {:>10} {:>11} {:>11} {:>11} {:>11} {:>8} {:>8}",
        "Tokens", "Dispatch", "Compute", "Seq ms", "DBO ms", "Comm %", "Kernel",
    );
    println!("  {}", "-".repeat(78));
    for p in &points {
        let t = &p.timings;
        println!(
            "  {:>10} {:>11.4} {:>11.4} {:>11.4} {:>11.4} {:>7.1}% {:>8}",
            p.tokens,
            t.dispatch_ms,
            t.compute_ms,
            t.sequential_total_ms,
            t.dbo_overlapped_ms,
            p.communication_share * 100.0,
            p.optimal.as_str(),
        );
    }
    println!();
    println!(
        "  Compute/communication crossover: {} tokens",
        format_crossover(compute_comm_crossover_tokens, |v| format!("{v:.0}")),
    );
    println!();

    Ok(())
}
