// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `moe-sim profiles` command: LL vs HT all-to-all kernels.

use super::{format_bytes, format_crossover, print_header, print_json};
use comm_kernels::{ProfileComparison, ProfileKind};
use crossover::Crossover;
use simulator::{CrossoverInput, SimConfig};

#[derive(serde::Serialize)]
struct ProfilesReport {
    comparison: ProfileComparison,
    crossover_bytes: Crossover,
    crossover_tokens: Crossover,
}

pub fn execute(config: SimConfig, json: bool) -> anyhow::Result<()> {
    let params = config.resolve_workload()?;
    let comparison = simulator::evaluate_kernel_profiles(params)?;
    let crossover_bytes = simulator::find_crossover(&CrossoverInput::Workload { params })?;
    let crossover_tokens = crossover_bytes.map(|b| crossover::payload_to_tokens(b, &params));

    if json {
        return print_json(&ProfilesReport {
            comparison,
            crossover_bytes,
            crossover_tokens,
        });
    }

    print_header("Kernel Profiles");
    println!(
        "  Base fabric: {:.1} µs, {:.1} GB/s",
        params.latency_us, params.bandwidth_gbps,
    );
    println!(
        "  Payload:     {} per rank ({} tokens)",
        format_bytes(params.payload_bytes_per_rank()),
        params.token_count,
    );
    println!();

    println!(
        "  {:<18} {:>12} {:>12} {:>12} {:>14}",
        "Profile", "Latency µs", "GB/s", "One-way ms", "Round-trip ms",
    );
    println!("  {}", "-".repeat(72));
    for kind in ProfileKind::ALL {
        let cost = comparison.cost(kind);
        let marker = if kind == comparison.optimal { " *" } else { "" };
        println!(
            "  {:<18} {:>12.2} {:>12.2} {:>12.4} {:>14.4}{marker}",
            cost.profile.name,
            cost.profile.effective_latency_ms * 1000.0,
            cost.profile.effective_bandwidth_gbps,
            cost.dispatch_ms,
            cost.round_trip_ms,
        );
    }
    println!();
    println!(
        "  Optimal: {} (saves {:.4} ms per round trip)",
        comparison.optimal.name(),
        comparison.savings_ms(),
    );
    println!(
        "  Crossover: {} per rank ({} tokens); LL below, HT above",
        format_crossover(crossover_bytes, format_bytes),
        format_crossover(crossover_tokens, |v| format!("{v:.0}")),
    );
    println!();

    Ok(())
}
