// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{Criterion, criterion_group, criterion_main};
use gate_alloc_core::prelude::TimeDelta;
use gate_alloc_model::prelude::*;
use gate_alloc_solver::prelude::*;
use std::{hint::black_box, time::Duration};

fn instance(flights: usize, gates: usize, seed: u64) -> NormalizedData {
    let doc = InstanceGenerator::new(flights, gates, seed)
        .generate()
        .expect("valid generator settings");
    Normalizer::normalize_document(doc).expect("generated data is consistent")
}

fn bench_conflict_detection(c: &mut Criterion) {
    let data = instance(400, 20, 11);
    let assignment: Assignment = data
        .flights()
        .iter_active()
        .map(|f| (f.id().clone(), f.original_gate().clone()))
        .collect();
    let detector = ConflictDetector::default();

    c.bench_function("ConflictDetector detect (400 flights, 20 gates)", |b| {
        b.iter(|| black_box(detector.detect(&assignment, data.flights())));
    });
}

fn bench_greedy(c: &mut Criterion) {
    let data = instance(200, 12, 7);
    let request = SolveRequest::new(data.flights(), data.gates(), data.distances());

    c.bench_function("GreedySolver solve (200 flights, 12 gates)", |b| {
        b.iter(|| black_box(GreedySolver.solve(&request).expect("distances complete")));
    });
}

fn bench_branch_and_bound(c: &mut Criterion) {
    let data = instance(40, 8, 3);
    let limits = SearchLimits::unbounded()
        .with_max_duration(Some(Duration::from_millis(200)))
        .with_max_nodes(Some(200_000));
    let request = SolveRequest::new(data.flights(), data.gates(), data.distances())
        .with_buffer(TimeDelta::new(15))
        .with_limits(limits);

    let mut group = c.benchmark_group("BranchAndBoundSolver");
    group.sample_size(10);
    group.bench_function("solve (40 flights, 8 gates)", |b| {
        b.iter(|| {
            let out = BranchAndBoundSolver
                .solve(&request)
                .expect("distances complete");
            assert!(out.conflicts().overlaps().is_empty());
            black_box(out)
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_conflict_detection,
    bench_greedy,
    bench_branch_and_bound
);
criterion_main!(benches);
