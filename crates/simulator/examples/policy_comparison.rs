// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Example: Compare pipeline policies across fabrics and batch sizes.
//!
//! Shows where dual-batch overlap pays off: small batches on slow fabrics
//! are latency-bound and gain little, while large batches hide most of the
//! all-to-all traffic behind expert compute.
//!
//! ```bash
//! cargo run -p simulator --example policy_comparison
//! ```

use cost_model::FabricPreset;
use pipeline_scheduler::PolicyKind;
use simulator::{Evaluator, SimConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let presets = [FabricPreset::Roce100g, FabricPreset::IbNdr, FabricPreset::NvLink4];
    let token_counts = [256u64, 4096, 65_536];

    println!(
        "{:<12} {:>8} {:>12} {:>12} {:>12} {:>9} {:>10}",
        "Fabric", "Tokens", "Seq ms", "DBO ms", "Schedule ms", "Speedup", "Kernel",
    );
    println!("{}", "-".repeat(82));

    for preset in presets {
        for tokens in token_counts {
            let mut config = SimConfig {
                fabric: Some(preset.as_str().into()),
                profile: "auto".into(),
                ..Default::default()
            };
            config.workload.token_count = tokens;

            match Evaluator::new(config).evaluate() {
                Ok(e) => println!(
                    "{:<12} {:>8} {:>12.3} {:>12.3} {:>12.3} {:>8.2}x {:>10}",
                    preset.as_str(),
                    tokens,
                    e.timings.sequential_total_ms,
                    e.timings.dbo_overlapped_ms,
                    e.schedule.total_ms,
                    e.timings.overlap_speedup(),
                    e.profiles.optimal,
                ),
                Err(err) => println!("{:<12} {:>8} FAIL: {err}", preset.as_str(), tokens),
            }
        }
    }

    // Lay out one step under both policies.
    println!("\n--- Schedules for 4096 tokens on ib-ndr ---\n");
    for policy in PolicyKind::ALL {
        let mut config = SimConfig {
            fabric: Some("ib-ndr".into()),
            policy: policy.as_str().into(),
            ..Default::default()
        };
        config.workload.token_count = 4096;
        let e = Evaluator::new(config).evaluate()?;
        println!("{}", e.schedule.summary());
        for block in &e.schedule.blocks {
            println!(
                "  {:<8} {} {:>10.3} → {:>10.3} ms  [{}]",
                block.phase.as_str(),
                block.batch,
                block.start_ms,
                block.end_ms(),
                block.resource(),
            );
        }
        println!();
    }

    Ok(())
}
