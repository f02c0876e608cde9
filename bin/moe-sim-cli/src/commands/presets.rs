// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `moe-sim presets` command: built-in fabric presets.

use super::{print_header, print_json};
use cost_model::FabricPreset;

#[derive(serde::Serialize)]
struct PresetRow {
    name: &'static str,
    latency_us: f64,
    bandwidth_gbps: f64,
    description: &'static str,
}

pub fn execute(json: bool) -> anyhow::Result<()> {
    let rows: Vec<PresetRow> = FabricPreset::ALL
        .iter()
        .map(|p| PresetRow {
            name: p.as_str(),
            latency_us: p.latency_us(),
            bandwidth_gbps: p.bandwidth_gbps(),
            description: p.description(),
        })
        .collect();

    if json {
        return print_json(&rows);
    }

    print_header("Fabric Presets");
    println!(
        "  {:<12} {:>12} {:>10}   {}",
        "Name", "Latency µs", "GB/s", "Description",
    );
    println!("  {}", "-".repeat(72));
    for r in &rows {
        println!(
            "  {:<12} {:>12.1} {:>10.1}   {}",
            r.name, r.latency_us, r.bandwidth_gbps, r.description,
        );
    }
    println!();
    println!("  Use with --fabric <name> or `fabric = \"<name>\"` in a config file.");
    println!();

    Ok(())
}
