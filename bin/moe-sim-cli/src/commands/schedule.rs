// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `moe-sim schedule` command: block table and ASCII timeline.

use super::{print_header, print_json};
use pipeline_scheduler::{BatchId, Phase, Resource, Schedule};
use simulator::{Evaluator, SimConfig};

pub fn execute(config: SimConfig, width: usize, json: bool) -> anyhow::Result<()> {
    let evaluation = Evaluator::new(config).evaluate()?;
    let schedule = &evaluation.schedule;
    if json {
        return print_json(schedule);
    }

    print_header("Pipeline Schedule");
    println!("  {}", schedule.summary());
    println!();

    // ── Blocks ─────────────────────────────────────────────────
    println!(
        "  {:<10} {:<6} {:<9} {:>12} {:>12} {:>12}",
        "Phase", "Batch", "Resource", "Start ms", "End ms", "Duration",
    );
    println!("  {}", "-".repeat(66));
    for block in &schedule.blocks {
        println!(
            "  {:<10} {:<6} {:<9} {:>12.4} {:>12.4} {:>12.4}",
            block.phase.as_str(),
            block.batch.to_string(),
            block.resource().to_string(),
            block.start_ms,
            block.end_ms(),
            block.duration_ms,
        );
    }
    println!();

    // ── Timeline ───────────────────────────────────────────────
    for line in timeline(schedule, width.max(8)) {
        println!("  {line}");
    }
    println!();
    println!("  D/X/C = dispatch/compute/combine; upper case batch A, lower case batch B");
    println!(
        "  Utilisation: fabric {:.0}%, compute {:.0}%",
        schedule.utilization(Resource::Fabric) * 100.0,
        schedule.utilization(Resource::ComputeEngine) * 100.0,
    );
    println!();

    Ok(())
}

fn glyph(phase: Phase, batch: BatchId) -> char {
    let c = match phase {
        Phase::Dispatch => 'D',
        Phase::Compute => 'X',
        Phase::Combine => 'C',
    };
    match batch {
        BatchId::A => c,
        BatchId::B => c.to_ascii_lowercase(),
    }
}

/// One row per resource, `width` cells spanning the schedule total.
fn timeline(schedule: &Schedule, width: usize) -> Vec<String> {
    if schedule.total_ms <= 0.0 {
        return vec!["(empty schedule)".to_string()];
    }
    let scale = width as f64 / schedule.total_ms;

    [Resource::Fabric, Resource::ComputeEngine]
        .into_iter()
        .map(|resource| {
            let mut row = vec!['.'; width];
            for block in schedule.blocks.iter().filter(|b| b.resource() == resource) {
                let start = ((block.start_ms * scale).round() as usize).min(width);
                let end = ((block.end_ms() * scale).round() as usize).min(width);
                for cell in &mut row[start..end] {
                    *cell = glyph(block.phase, block.batch);
                }
            }
            format!("{:<8} |{}|", resource.to_string(), row.into_iter().collect::<String>())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cost_model::Timings;
    use pipeline_scheduler::PolicyKind;

    #[test]
    fn test_timeline_sequential() {
        let t = Timings::from_phases(2.0, 4.0, 2.0);
        let s = pipeline_scheduler::build_schedule(&t, PolicyKind::Sequential, false).unwrap();
        let rows = timeline(&s, 8);
        assert_eq!(rows[0], "fabric   |DD....CC|");
        assert_eq!(rows[1], "compute  |..XXXX..|");
    }

    #[test]
    fn test_timeline_empty() {
        let s = pipeline_scheduler::build_schedule(&Timings::zero(), PolicyKind::Overlapped, false)
            .unwrap();
        assert_eq!(timeline(&s, 8), vec!["(empty schedule)".to_string()]);
    }

    #[test]
    fn test_glyph() {
        assert_eq!(glyph(Phase::Compute, BatchId::A), 'X');
        assert_eq!(glyph(Phase::Combine, BatchId::B), 'c');
    }
}
