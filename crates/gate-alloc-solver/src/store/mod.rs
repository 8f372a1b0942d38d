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

pub mod err;

use crate::store::err::ConcurrencyConflict;
use gate_alloc_model::prelude::{
    Assignment, ConflictSet, DistanceMatrix, FlightContainer, GateContainer, Generation,
};
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

/// Point-in-time view of the operational state. Immutable once published.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    flights: FlightContainer,
    gates: GateContainer,
    distances: Arc<DistanceMatrix>,
    assignment: Assignment,
    conflicts: ConflictSet,
}

impl Snapshot {
    /// The assignment is stamped with `generation`.
    pub fn new(
        flights: FlightContainer,
        gates: GateContainer,
        distances: Arc<DistanceMatrix>,
        assignment: Assignment,
        conflicts: ConflictSet,
        generation: Generation,
    ) -> Self {
        Self {
            flights,
            gates,
            distances,
            assignment: assignment.with_generation(generation),
            conflicts,
        }
    }

    #[inline]
    pub fn flights(&self) -> &FlightContainer {
        &self.flights
    }

    #[inline]
    pub fn gates(&self) -> &GateContainer {
        &self.gates
    }

    #[inline]
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    #[inline]
    pub fn shared_distances(&self) -> Arc<DistanceMatrix> {
        Arc::clone(&self.distances)
    }

    #[inline]
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    #[inline]
    pub fn conflicts(&self) -> &ConflictSet {
        &self.conflicts
    }

    #[inline]
    pub fn generation(&self) -> Generation {
        self.assignment.generation()
    }
}

/// Holds while a writer works on a batch. Released with a fair unlock so
/// queued writers run in arrival order.
pub struct WriterGuard<'a> {
    guard: Option<MutexGuard<'a, ()>>,
}

impl Drop for WriterGuard<'_> {
    fn drop(&mut self) {
        if let Some(guard) = self.guard.take() {
            MutexGuard::unlock_fair(guard);
        }
    }
}

impl std::fmt::Debug for WriterGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterGuard").finish_non_exhaustive()
    }
}

/// Owner of the committed snapshot.
///
/// Readers take the read lock only long enough to clone an `Arc`, so a
/// reader sees either the old or the new snapshot, never a mix. Commits are
/// a compare-and-swap on the generation.
#[derive(Debug)]
pub struct StateStore {
    current: RwLock<Arc<Snapshot>>,
    writer: Mutex<()>,
    generation: AtomicU64,
}

impl StateStore {
    pub fn new(initial: Snapshot) -> Self {
        let generation = initial.generation().value();
        tracing::info!(
            generation,
            flights = initial.flights().len(),
            gates = initial.gates().len(),
            "state store initialized"
        );
        Self {
            current: RwLock::new(Arc::new(initial)),
            writer: Mutex::new(()),
            generation: AtomicU64::new(generation),
        }
    }

    #[inline]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read())
    }

    /// Latest committed generation, without touching the snapshot lock.
    #[inline]
    pub fn generation(&self) -> Generation {
        Generation::new(self.generation.load(Ordering::Acquire))
    }

    #[inline]
    pub fn lock_writer(&self) -> WriterGuard<'_> {
        WriterGuard {
            guard: Some(self.writer.lock()),
        }
    }

    /// Publishes a new snapshot if `base` is still the current generation.
    /// The distance matrix is carried over from the current snapshot.
    pub fn commit(
        &self,
        base: Generation,
        flights: FlightContainer,
        gates: GateContainer,
        assignment: Assignment,
        conflicts: ConflictSet,
    ) -> Result<Generation, ConcurrencyConflict> {
        let mut current = self.current.write();
        let actual = current.generation();
        if actual != base {
            tracing::debug!(
                expected = base.value(),
                actual = actual.value(),
                "rejected stale commit"
            );
            return Err(ConcurrencyConflict::new(base, actual));
        }

        let next = base.next();
        let distances = current.shared_distances();
        *current = Arc::new(Snapshot::new(
            flights,
            gates,
            distances,
            assignment,
            conflicts,
            next,
        ));
        self.generation.store(next.value(), Ordering::Release);
        tracing::info!(generation = next.value(), "committed assignment");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gate_alloc_model::prelude::{FlightIdentifier, GateIdentifier};
    use std::thread;

    fn asg(pairs: &[(&str, &str)]) -> Assignment {
        pairs
            .iter()
            .map(|(f, g)| (FlightIdentifier::from(*f), GateIdentifier::from(*g)))
            .collect()
    }

    fn store() -> StateStore {
        StateStore::new(Snapshot::new(
            FlightContainer::new(),
            GateContainer::new(),
            Arc::new(DistanceMatrix::new()),
            asg(&[("F1", "G1")]),
            ConflictSet::default(),
            Generation::new(1),
        ))
    }

    #[test]
    fn test_snapshot_stamps_generation() {
        let s = store();
        let snap = s.snapshot();
        assert_eq!(snap.generation(), Generation::new(1));
        assert_eq!(snap.assignment().generation(), Generation::new(1));
        assert_eq!(s.generation(), Generation::new(1));
    }

    #[test]
    fn test_commit_advances_generation() {
        let s = store();
        let g = s
            .commit(
                Generation::new(1),
                FlightContainer::new(),
                GateContainer::new(),
                asg(&[("F1", "G2")]),
                ConflictSet::default(),
            )
            .unwrap();
        assert_eq!(g, Generation::new(2));
        let snap = s.snapshot();
        assert_eq!(snap.generation(), Generation::new(2));
        assert_eq!(
            snap.assignment().gate_of(&FlightIdentifier::from("F1")),
            Some(&GateIdentifier::from("G2"))
        );
    }

    #[test]
    fn test_stale_commit_is_rejected() {
        let s = store();
        let before = s.snapshot();
        let err = s
            .commit(
                Generation::new(0),
                FlightContainer::new(),
                GateContainer::new(),
                asg(&[("F1", "G9")]),
                ConflictSet::default(),
            )
            .unwrap_err();
        assert_eq!(err.expected(), Generation::new(0));
        assert_eq!(err.actual(), Generation::new(1));
        assert_eq!(*s.snapshot(), *before);
    }

    #[test]
    fn test_old_snapshot_survives_commit() {
        let s = store();
        let old = s.snapshot();
        s.commit(
            Generation::new(1),
            FlightContainer::new(),
            GateContainer::new(),
            asg(&[]),
            ConflictSet::default(),
        )
        .unwrap();
        assert_eq!(old.assignment().len(), 1);
        assert!(s.snapshot().assignment().is_empty());
    }

    #[test]
    fn test_writers_are_serialized() {
        let s = Arc::new(store());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let s = Arc::clone(&s);
                thread::spawn(move || {
                    let _guard = s.lock_writer();
                    let base = s.snapshot().generation();
                    let gate = format!("G{}", i);
                    s.commit(
                        base,
                        FlightContainer::new(),
                        GateContainer::new(),
                        asg(&[("F1", gate.as_str())]),
                        ConflictSet::default(),
                    )
                })
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap().is_ok());
        }
        assert_eq!(s.generation(), Generation::new(9));
    }
}
