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
    bnb::BranchAndBoundSolver,
    config::EngineConfig,
    conflict::ConflictDetector,
    engine::{
        err::ReassignError,
        events::DisruptionEvent,
        orchestrator::{ReassignmentReport, Reassigner},
    },
    solver::{AssignmentSolver, SolveRequest, err::SolveError},
    store::{Snapshot, StateStore},
};
use gate_alloc_model::prelude::{
    Assignment, ConflictSet, FlightContainer, GateContainer, Generation, NormalizedData,
};
use serde::Serialize;
use std::sync::Arc;

/// Read-only view returned to query consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentAssignmentView {
    pub flights: FlightContainer,
    pub gates: GateContainer,
    pub assignment: Assignment,
    pub generation: Generation,
    pub conflicts: ConflictSet,
}

impl From<&Snapshot> for CurrentAssignmentView {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            flights: snapshot.flights().clone(),
            gates: snapshot.gates().clone(),
            assignment: snapshot.assignment().clone(),
            generation: snapshot.generation(),
            conflicts: snapshot.conflicts().clone(),
        }
    }
}

/// The engine as seen by a hosting layer. Safe to share between threads.
#[derive(Debug)]
pub struct GateAllocationEngine {
    store: StateStore,
    config: EngineConfig,
}

impl GateAllocationEngine {
    /// Solves the freshly loaded data against the original gates and
    /// publishes the result as generation 1.
    #[tracing::instrument(level = "info", skip_all, fields(flights = data.flights().len()))]
    pub fn bootstrap(data: NormalizedData, config: EngineConfig) -> Result<Self, SolveError> {
        let (flights, gates, distances) = data.into_parts();
        let outcome = BranchAndBoundSolver.solve(
            &SolveRequest::new(&flights, &gates, &distances)
                .with_buffer(config.buffer())
                .with_limits(config.limits()),
        )?;
        tracing::info!(
            fitness = %outcome.fitness(),
            status = ?outcome.status(),
            stability = ?outcome.stability(),
            "initial solve finished"
        );

        let (assignment, conflicts, ..) = outcome.into_parts();
        let snapshot = Snapshot::new(
            flights,
            gates,
            Arc::new(distances),
            assignment,
            conflicts,
            Generation::new(1),
        );
        Ok(Self {
            store: StateStore::new(snapshot),
            config,
        })
    }

    /// Publishes the data as loaded, every active flight on its original
    /// gate, as generation 0. Nothing is solved; conflicts are reported.
    pub fn unsolved(data: NormalizedData, config: EngineConfig) -> Self {
        let (flights, gates, distances) = data.into_parts();
        let assignment: Assignment = flights
            .iter_active()
            .map(|f| (f.id().clone(), f.original_gate().clone()))
            .collect();
        let conflicts = ConflictDetector::new(config.buffer()).detect(&assignment, &flights);
        if !conflicts.is_empty() {
            tracing::warn!(
                overlaps = conflicts.overlaps().len(),
                "loaded schedule contains gate conflicts"
            );
        }
        let snapshot = Snapshot::new(
            flights,
            gates,
            Arc::new(distances),
            assignment,
            conflicts,
            Generation::new(0),
        );
        Self {
            store: StateStore::new(snapshot),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.snapshot()
    }

    #[inline]
    pub fn generation(&self) -> Generation {
        self.store.generation()
    }

    pub fn current_assignment(&self) -> CurrentAssignmentView {
        CurrentAssignmentView::from(self.store.snapshot().as_ref())
    }

    pub fn reassign(
        &self,
        events: &[DisruptionEvent],
    ) -> Result<ReassignmentReport, ReassignError> {
        Reassigner::new(&self.store, BranchAndBoundSolver, self.config).reassign(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gate_alloc_model::prelude::{FlightIdentifier, GateIdentifier, Normalizer, SnapshotDocument};

    fn document() -> SnapshotDocument {
        serde_json::from_str(
            r#"{
                "gates": [
                    {"id": "G1", "coordinates": [0, 0]},
                    {"id": "G2", "coordinates": [10, 0]}
                ],
                "flights": [
                    {"id": "A", "original_gate_id": "G1", "arrival": 600, "departure": 630},
                    {"id": "B", "original_gate_id": "G1", "arrival": 615, "departure": 645}
                ],
                "distances": [{"gate_a": "G1", "gate_b": "G2", "cost": 10.0}]
            }"#,
        )
        .unwrap()
    }

    fn data() -> NormalizedData {
        Normalizer::normalize_document(document()).unwrap()
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GateAllocationEngine>();
    }

    #[test]
    fn test_bootstrap_publishes_solved_generation_one() {
        let engine = GateAllocationEngine::bootstrap(data(), EngineConfig::default()).unwrap();
        let view = engine.current_assignment();
        assert_eq!(view.generation, Generation::new(1));
        assert!(view.conflicts.is_empty());
        assert_eq!(
            view.assignment.gate_of(&FlightIdentifier::from("A")),
            Some(&GateIdentifier::from("G1"))
        );
        assert_eq!(
            view.assignment.gate_of(&FlightIdentifier::from("B")),
            Some(&GateIdentifier::from("G2"))
        );
    }

    #[test]
    fn test_unsolved_reports_conflicts() {
        let engine = GateAllocationEngine::unsolved(data(), EngineConfig::default());
        let view = engine.current_assignment();
        assert_eq!(view.generation, Generation::new(0));
        assert_eq!(view.conflicts.overlaps().len(), 1);
    }

    #[test]
    fn test_view_serializes_flat_lists() {
        let engine = GateAllocationEngine::unsolved(data(), EngineConfig::default());
        let json = serde_json::to_value(engine.current_assignment()).unwrap();
        assert_eq!(json["generation"], 0);
        assert_eq!(json["flights"].as_array().unwrap().len(), 2);
        assert_eq!(json["assignment"]["gates"]["B"], "G1");
    }
}
