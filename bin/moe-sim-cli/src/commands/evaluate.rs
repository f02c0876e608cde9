// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `moe-sim evaluate` command: the full report for one configuration.

use super::{format_bytes, format_crossover, print_header, print_json};
use simulator::{Evaluator, SimConfig};

pub fn execute(config: SimConfig, json: bool) -> anyhow::Result<()> {
    let evaluation = Evaluator::new(config).evaluate()?;
    if json {
        return print_json(&evaluation);
    }

    print_header("Layer Evaluation");

    let p = &evaluation.params;
    let t = &evaluation.timings;
    println!("  Workload: {}", p.summary());
    println!(
        "  Payload:  {} per rank per leg",
        format_bytes(p.payload_bytes_per_rank()),
    );
    println!(
        "  Kernel:   {}",
        evaluation
            .applied_profile
            .map_or("base fabric", |k| k.name()),
    );
    println!();

    // ── Phase Timings ──────────────────────────────────────────
    println!("  {:<22} {:>12}", "Phase", "ms");
    println!("  {}", "-".repeat(35));
    println!("  {:<22} {:>12.4}", "dispatch", t.dispatch_ms);
    println!("  {:<22} {:>12.4}", "expert compute", t.compute_ms);
    println!("  {:<22} {:>12.4}", "combine", t.combine_ms);
    println!("  {}", "-".repeat(35));
    println!("  {:<22} {:>12.4}", "sequential", t.sequential_total_ms);
    println!("  {:<22} {:>12.4}", "dual-batch overlap", t.dbo_overlapped_ms);
    println!();
    println!(
        "  Overlap speedup {:.2}x, hides {:.4} ms, communication share {:.1}%, bound by {}",
        t.overlap_speedup(),
        t.hidden_ms(),
        t.communication_share() * 100.0,
        t.bottleneck(),
    );
    println!();

    // ── Kernel Profiles ────────────────────────────────────────
    println!("  Kernels: {}", evaluation.profiles.summary());
    println!(
        "  LL/HT crossover: {} per rank ({} tokens)",
        format_crossover(evaluation.payload_crossover_bytes, format_bytes),
        format_crossover(evaluation.payload_crossover_tokens, |v| format!("{v:.0}")),
    );
    println!(
        "  Compute/communication crossover: {} tokens",
        format_crossover(evaluation.compute_comm_crossover_tokens, |v| format!("{v:.0}")),
    );
    println!();

    // ── Schedule ───────────────────────────────────────────────
    println!("  Schedule: {}", evaluation.schedule.summary());
    println!();

    Ok(())
}
