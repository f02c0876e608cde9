// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for the closed-form cost model.

use cost_model::{evaluate, WorkloadParameters};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_evaluate(c: &mut Criterion) {
    let params = WorkloadParameters::default();
    c.bench_function("evaluate/reference", |b| {
        b.iter(|| evaluate(black_box(params)))
    });
}

fn bench_token_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate/tokens");
    for tokens in [256u64, 16_384, 1 << 20] {
        let params = WorkloadParameters::default().with_tokens(tokens);
        group.bench_with_input(BenchmarkId::from_parameter(tokens), &params, |b, p| {
            b.iter(|| evaluate(black_box(*p)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_token_sweep);
criterion_main!(benches);
