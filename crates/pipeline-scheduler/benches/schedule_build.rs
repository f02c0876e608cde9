// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for schedule construction.

use cost_model::{evaluate, WorkloadParameters};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pipeline_scheduler::{build_schedule, PolicyKind};

fn bench_sequential(c: &mut Criterion) {
    let timings = evaluate(WorkloadParameters::default()).unwrap();
    c.bench_function("schedule/sequential", |b| {
        b.iter(|| build_schedule(black_box(&timings), PolicyKind::Sequential, false))
    });
}

fn bench_overlapped(c: &mut Criterion) {
    let timings = evaluate(WorkloadParameters::default()).unwrap();
    c.bench_function("schedule/overlapped", |b| {
        b.iter(|| build_schedule(black_box(&timings), PolicyKind::Overlapped, false))
    });
    c.bench_function("schedule/overlapped-split", |b| {
        b.iter(|| build_schedule(black_box(&timings), PolicyKind::Overlapped, true))
    });
}

criterion_group!(benches, bench_sequential, bench_overlapped);
criterion_main!(benches);
