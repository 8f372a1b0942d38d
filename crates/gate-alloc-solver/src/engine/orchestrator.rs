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

use crate::{
    config::EngineConfig,
    engine::{
        err::ReassignError,
        events::{DisruptionEvent, RejectedEvent},
    },
    solver::{AssignmentSolver, SolveRequest, SolveStatus},
    store::{Snapshot, StateStore, err::ConcurrencyConflict},
};
use gate_alloc_core::prelude::unscale_cost;
use gate_alloc_model::prelude::{
    Assignment, AssignmentValidator, FlightIdentifier, GateChange, Generation,
};
use serde::Serialize;

/// Result of one `reassign` batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReassignmentReport {
    pub generation: Generation,
    pub assignment: Assignment,
    /// Every flight whose gate differs from the pre-event assignment.
    pub changed_flights: Vec<GateChange>,
    pub unresolved_conflicts: Vec<FlightIdentifier>,
    pub degraded: bool,
    /// True only if a search ran to completion for this batch.
    pub optimal: bool,
    /// False when the batch left the state as it was and nothing was committed.
    pub committed: bool,
    pub rejected_events: Vec<RejectedEvent>,
    /// Total movement cost against the pre-event assignment.
    pub objective: f64,
}

enum Attempt {
    Done(Box<ReassignmentReport>),
    Stale(ConcurrencyConflict),
}

/// Applies disruption batches to the store's state and commits the
/// re-solved assignment.
#[derive(Debug)]
pub struct Reassigner<'s, S> {
    store: &'s StateStore,
    solver: S,
    config: EngineConfig,
}

impl<'s, S> Reassigner<'s, S>
where
    S: AssignmentSolver,
{
    #[inline]
    pub fn new(store: &'s StateStore, solver: S, config: EngineConfig) -> Self {
        Self {
            store,
            solver,
            config,
        }
    }

    /// Runs the batch under the store's writer lock. Rejected events are
    /// reported, never raised; only internal failures return `Err`, and
    /// then the committed state is unchanged.
    #[tracing::instrument(level = "info", skip_all, fields(events = events.len()))]
    pub fn reassign(
        &self,
        events: &[DisruptionEvent],
    ) -> Result<ReassignmentReport, ReassignError> {
        let _writer = self.store.lock_writer();
        let mut retries = 0u32;
        loop {
            let base = self.store.snapshot();
            match self.attempt(&base, events)? {
                Attempt::Done(report) => return Ok(*report),
                Attempt::Stale(conflict) if retries < self.config.commit_retries => {
                    retries += 1;
                    tracing::debug!(
                        retries,
                        stale = conflict.expected().value(),
                        latest = conflict.actual().value(),
                        "re-applying batch against newer state"
                    );
                }
                Attempt::Stale(conflict) => {
                    tracing::error!(error = %conflict, "giving up on stale commit");
                    return Err(conflict.into());
                }
            }
        }
    }

    fn attempt(
        &self,
        base: &Snapshot,
        events: &[DisruptionEvent],
    ) -> Result<Attempt, ReassignError> {
        let mut flights = base.flights().clone();
        let mut gates = base.gates().clone();
        let mut rejected = Vec::new();
        let mut applied = 0usize;

        for (index, event) in events.iter().enumerate() {
            match event.apply(&mut flights, &mut gates) {
                Ok(()) => {
                    applied += 1;
                    tracing::debug!(index, %event, "applied event");
                }
                Err(err) => {
                    tracing::warn!(index, %event, error = %err, "rejected event");
                    rejected.push(RejectedEvent::new(index, event.clone(), &err));
                }
            }
        }

        let anchor = base.assignment();
        let buffer = self.config.buffer();
        if applied == 0
            && AssignmentValidator::validate_stable(anchor, &flights, &gates, buffer).is_ok()
        {
            tracing::info!(
                generation = base.generation().value(),
                "state already stable, nothing to commit"
            );
            return Ok(Attempt::Done(Box::new(ReassignmentReport {
                generation: base.generation(),
                assignment: anchor.clone(),
                changed_flights: Vec::new(),
                unresolved_conflicts: Vec::new(),
                degraded: false,
                optimal: false,
                committed: false,
                rejected_events: rejected,
                objective: 0.0,
            })));
        }

        let request = SolveRequest::new(&flights, &gates, base.distances())
            .with_anchor(anchor)
            .with_buffer(buffer)
            .with_limits(self.config.limits());
        let outcome = self.solver.solve(&request)?;
        AssignmentValidator::validate_hard(outcome.assignment(), &flights, &gates, buffer)?;

        // A degraded state the solver cannot improve stays as it is.
        if applied == 0
            && outcome.assignment().same_mapping(anchor)
            && outcome.conflicts() == base.conflicts()
        {
            tracing::info!(
                generation = base.generation().value(),
                unresolved = outcome.conflicts().unresolved().len(),
                "solver kept the current assignment, nothing to commit"
            );
            let unresolved_conflicts = outcome.conflicts().unresolved().to_vec();
            return Ok(Attempt::Done(Box::new(ReassignmentReport {
                generation: base.generation(),
                assignment: anchor.clone(),
                changed_flights: Vec::new(),
                degraded: !unresolved_conflicts.is_empty(),
                unresolved_conflicts,
                optimal: outcome.status() == SolveStatus::Optimal,
                committed: false,
                rejected_events: rejected,
                objective: unscale_cost(outcome.fitness().cost),
            })));
        }

        let changed_flights = anchor.changes_to(outcome.assignment());
        let (assignment, conflicts, fitness, status, _) = outcome.into_parts();
        let unresolved_conflicts = conflicts.unresolved().to_vec();

        let generation = match self.store.commit(
            base.generation(),
            flights,
            gates,
            assignment.clone(),
            conflicts,
        ) {
            Ok(generation) => generation,
            Err(conflict) => return Ok(Attempt::Stale(conflict)),
        };

        let degraded = !unresolved_conflicts.is_empty();
        if degraded {
            tracing::warn!(
                generation = generation.value(),
                unresolved = unresolved_conflicts.len(),
                "committed degraded assignment"
            );
        } else {
            tracing::info!(
                generation = generation.value(),
                changed = changed_flights.len(),
                "committed reassignment"
            );
        }

        Ok(Attempt::Done(Box::new(ReassignmentReport {
            generation,
            assignment: assignment.with_generation(generation),
            changed_flights,
            unresolved_conflicts,
            degraded,
            optimal: status == SolveStatus::Optimal,
            committed: true,
            rejected_events: rejected,
            objective: unscale_cost(fitness.cost),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bnb::BranchAndBoundSolver,
        conflict::ConflictDetector,
        model::index::GateIndex,
        solver::{SearchStats, SolveOutcome, err::SolveError},
    };
    use gate_alloc_core::prelude::{TimeInterval, TimePoint};
    use gate_alloc_model::prelude::{
        DistanceMatrix, Flight, FlightContainer, FlightStatus, Gate, GateContainer,
        GateIdentifier, Location,
    };
    use std::{cell::Cell, sync::Arc};

    fn gid(s: &str) -> GateIdentifier {
        GateIdentifier::from(s)
    }

    fn fid(s: &str) -> FlightIdentifier {
        FlightIdentifier::from(s)
    }

    fn flight(id: &str, a: i64, d: i64, gate: &str) -> Flight {
        Flight::new(
            fid(id),
            TimeInterval::new(TimePoint::new(a), TimePoint::new(d)),
            gid(gate),
            FlightStatus::Scheduled,
        )
    }

    /// Two flights at the same time on G1 and G2, with G3 as a spare.
    fn store() -> StateStore {
        let flights: FlightContainer =
            vec![flight("A", 600, 660, "G1"), flight("B", 600, 660, "G2")]
                .into_iter()
                .collect();
        let gates: GateContainer = ["G1", "G2", "G3"]
            .iter()
            .enumerate()
            .map(|(i, g)| Gate::new(gid(g), Location::Planar([i as f64, 0.0]), true))
            .collect();
        let mut d = DistanceMatrix::new();
        d.insert(&gid("G1"), &gid("G2"), 100);
        d.insert(&gid("G1"), &gid("G3"), 200);
        d.insert(&gid("G2"), &gid("G3"), 100);
        let assignment: Assignment = vec![(fid("A"), gid("G1")), (fid("B"), gid("G2"))]
            .into_iter()
            .collect();
        let conflicts = ConflictDetector::default().detect(&assignment, &flights);
        StateStore::new(Snapshot::new(
            flights,
            gates,
            Arc::new(d),
            assignment,
            conflicts,
            Generation::new(1),
        ))
    }

    fn config() -> EngineConfig {
        EngineConfig::default().with_time_limit(None)
    }

    /// Commits behind the orchestrator's back on its first call.
    struct RacingSolver<'a> {
        store: &'a StateStore,
        raced: Cell<u32>,
        races: u32,
    }

    impl AssignmentSolver for RacingSolver<'_> {
        fn name(&self) -> &str {
            "RacingSolver"
        }

        fn solve(&self, request: &SolveRequest<'_>) -> Result<SolveOutcome, SolveError> {
            if self.raced.get() < self.races {
                self.raced.set(self.raced.get() + 1);
                let snap = self.store.snapshot();
                self.store
                    .commit(
                        snap.generation(),
                        snap.flights().clone(),
                        snap.gates().clone(),
                        snap.assignment().clone(),
                        snap.conflicts().clone(),
                    )
                    .unwrap();
            }
            BranchAndBoundSolver.solve(request)
        }
    }

    /// Piles every flight onto the first open gate.
    struct PilingSolver;

    impl AssignmentSolver for PilingSolver {
        fn name(&self) -> &str {
            "PilingSolver"
        }

        fn solve(&self, request: &SolveRequest<'_>) -> Result<SolveOutcome, SolveError> {
            let model = request.model()?;
            let choices = vec![Some(GateIndex(0)); model.flights_len()];
            Ok(SolveOutcome::from_choices(
                &model,
                &choices,
                SolveStatus::Optimal,
                SearchStats::default(),
            ))
        }
    }

    #[test]
    fn test_empty_batch_on_stable_state_is_a_no_op() {
        let s = store();
        let report = Reassigner::new(&s, BranchAndBoundSolver, config())
            .reassign(&[])
            .unwrap();
        assert!(!report.committed);
        assert_eq!(report.generation, Generation::new(1));
        assert!(report.changed_flights.is_empty());
        assert_eq!(s.generation(), Generation::new(1));
    }

    #[test]
    fn test_repeated_empty_batch_on_degraded_state_keeps_generation() {
        let flights: FlightContainer = vec![
            flight("A", 600, 700, "G1"),
            flight("B", 600, 700, "G1"),
            flight("C", 600, 700, "G2"),
        ]
        .into_iter()
        .collect();
        let gates: GateContainer = ["G1", "G2"]
            .iter()
            .enumerate()
            .map(|(i, g)| Gate::new(gid(g), Location::Planar([i as f64, 0.0]), true))
            .collect();
        let mut d = DistanceMatrix::new();
        d.insert(&gid("G1"), &gid("G2"), 100);
        // B has no room left and is already out of the plan.
        let assignment: Assignment = vec![(fid("A"), gid("G1")), (fid("C"), gid("G2"))]
            .into_iter()
            .collect();
        let conflicts = ConflictDetector::default().detect(&assignment, &flights);
        let s = StateStore::new(Snapshot::new(
            flights,
            gates,
            Arc::new(d),
            assignment,
            conflicts,
            Generation::new(1),
        ));

        let reassigner = Reassigner::new(&s, BranchAndBoundSolver, config());
        for _ in 0..2 {
            let report = reassigner.reassign(&[]).unwrap();
            assert!(!report.committed);
            assert!(report.degraded);
            assert_eq!(report.generation, Generation::new(1));
            assert_eq!(report.unresolved_conflicts, vec![fid("B")]);
            assert!(report.changed_flights.is_empty());
        }
        assert_eq!(s.generation(), Generation::new(1));
    }

    #[test]
    fn test_close_gate_moves_its_flight() {
        let s = store();
        let report = Reassigner::new(&s, BranchAndBoundSolver, config())
            .reassign(&[DisruptionEvent::close_gate("G1")])
            .unwrap();
        assert!(report.committed);
        assert_eq!(report.generation, Generation::new(2));
        assert_eq!(
            report.changed_flights,
            vec![GateChange {
                flight_id: fid("A"),
                old_gate_id: Some(gid("G1")),
                new_gate_id: Some(gid("G3")),
            }]
        );
        assert_eq!(report.objective, 2.0);
        assert!(report.optimal);
        assert!(!s.snapshot().gates().is_open(&gid("G1")));
    }

    #[test]
    fn test_rejected_events_do_not_block_valid_ones() {
        let s = store();
        let report = Reassigner::new(&s, BranchAndBoundSolver, config())
            .reassign(&[
                DisruptionEvent::close_gate("G9"),
                DisruptionEvent::close_gate("G2"),
            ])
            .unwrap();
        assert_eq!(report.rejected_events.len(), 1);
        assert_eq!(report.rejected_events[0].index, 0);
        assert_eq!(report.changed_flights.len(), 1);
        assert_eq!(report.changed_flights[0].flight_id, fid("B"));
    }

    #[test]
    fn test_only_rejected_events_keep_state() {
        let s = store();
        let report = Reassigner::new(&s, BranchAndBoundSolver, config())
            .reassign(&[DisruptionEvent::delay_flight("ZZ", 10)])
            .unwrap();
        assert!(!report.committed);
        assert_eq!(report.rejected_events.len(), 1);
        assert_eq!(s.generation(), Generation::new(1));
    }

    #[test]
    fn test_stale_commit_is_retried() {
        let s = store();
        let solver = RacingSolver {
            store: &s,
            raced: Cell::new(0),
            races: 1,
        };
        let report = Reassigner::new(&s, solver, config())
            .reassign(&[DisruptionEvent::close_gate("G1")])
            .unwrap();
        assert_eq!(report.generation, Generation::new(3));
        assert_eq!(s.generation(), Generation::new(3));
    }

    #[test]
    fn test_exhausted_retries_surface_error() {
        let s = store();
        let solver = RacingSolver {
            store: &s,
            raced: Cell::new(0),
            races: u32::MAX,
        };
        let err = Reassigner::new(&s, solver, config().with_commit_retries(1))
            .reassign(&[DisruptionEvent::close_gate("G1")])
            .unwrap_err();
        assert!(matches!(err, ReassignError::RetriesExhausted(_)));
        assert!(s.snapshot().gates().is_open(&gid("G1")));
    }

    #[test]
    fn test_invalid_outcome_aborts_without_commit() {
        let s = store();
        let before = s.snapshot();
        let err = Reassigner::new(&s, PilingSolver, config())
            .reassign(&[DisruptionEvent::close_gate("G3")])
            .unwrap_err();
        assert!(matches!(err, ReassignError::InvalidOutcome(_)));
        assert_eq!(*s.snapshot(), *before);
    }
}
