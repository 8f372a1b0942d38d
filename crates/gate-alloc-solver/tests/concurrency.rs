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

use gate_alloc_model::prelude::*;
use gate_alloc_solver::prelude::*;
use std::{thread, time::Duration};

fn engine() -> GateAllocationEngine {
    let doc = InstanceGenerator::new(30, 6, 21).generate().unwrap();
    let data = Normalizer::normalize_document(doc).unwrap();
    let config = EngineConfig::default()
        .with_time_limit(Some(Duration::from_millis(200)))
        .with_buffer_minutes(5);
    GateAllocationEngine::bootstrap(data, config).unwrap()
}

#[test]
fn test_readers_never_observe_torn_snapshots() {
    let engine = engine();
    let detector = ConflictDetector::new(engine.config().buffer());
    let flight_ids: Vec<FlightIdentifier> = engine
        .snapshot()
        .flights()
        .iter_active()
        .map(|f| f.id().clone())
        .take(6)
        .collect();

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let mut last = Generation::new(0);
                for _ in 0..200 {
                    let snap = engine.snapshot();
                    assert!(snap.generation() >= last);
                    last = snap.generation();
                    assert_eq!(snap.assignment().generation(), snap.generation());
                    // Conflicts always belong to the assignment they were published with.
                    assert_eq!(
                        &detector.detect(snap.assignment(), snap.flights()),
                        snap.conflicts()
                    );
                    AssignmentValidator::validate_hard(
                        snap.assignment(),
                        snap.flights(),
                        snap.gates(),
                        engine.config().buffer(),
                    )
                    .unwrap();
                }
            });
        }

        scope.spawn(|| {
            for (i, id) in flight_ids.iter().enumerate() {
                let minutes = if i % 2 == 0 { 40 } else { -25 };
                engine
                    .reassign(&[DisruptionEvent::DelayFlight {
                        flight_id: id.clone(),
                        minutes,
                    }])
                    .unwrap();
            }
        });
    });

    assert_eq!(engine.generation(), Generation::new(1 + 6));
}

#[test]
fn test_concurrent_batches_get_distinct_generations() {
    let engine = engine();
    let gates: Vec<GateIdentifier> = engine.snapshot().gates().ids().cloned().collect();

    let generations: Vec<Generation> = thread::scope(|scope| {
        let handles: Vec<_> = gates
            .iter()
            .take(3)
            .map(|g| {
                let engine = &engine;
                scope.spawn(move || {
                    engine
                        .reassign(&[DisruptionEvent::CloseGate {
                            gate_id: g.clone(),
                        }])
                        .unwrap()
                        .generation
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let mut sorted = generations.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted, vec![Generation::new(2), Generation::new(3), Generation::new(4)]);
    let snap = engine.snapshot();
    for g in gates.iter().take(3) {
        assert!(!snap.gates().is_open(g));
    }
}
