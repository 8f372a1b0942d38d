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

use crate::{
    conflict::ConflictDetector,
    model::{index::GateIndex, solver_model::SolverModel},
    monitor::limits::SearchLimits,
    solver::err::SolveError,
    state::fitness::Fitness,
};
use gate_alloc_core::prelude::TimeDelta;
use gate_alloc_model::prelude::{
    Assignment, ConflictSet, DistanceMatrix, FlightContainer, GateContainer,
};
use num_traits::Zero;
use serde::Serialize;
use std::time::Duration;

/// Everything one solve needs. Borrowed, so building a request is free.
#[derive(Debug, Clone, Copy)]
pub struct SolveRequest<'a> {
    flights: &'a FlightContainer,
    gates: &'a GateContainer,
    distances: &'a DistanceMatrix,
    anchor: Option<&'a Assignment>,
    buffer: TimeDelta<i64>,
    limits: SearchLimits,
}

impl<'a> SolveRequest<'a> {
    #[inline]
    pub fn new(
        flights: &'a FlightContainer,
        gates: &'a GateContainer,
        distances: &'a DistanceMatrix,
    ) -> Self {
        Self {
            flights,
            gates,
            distances,
            anchor: None,
            buffer: TimeDelta::zero(),
            limits: SearchLimits::default(),
        }
    }

    /// Movement cost and change count are measured against this assignment
    /// instead of the original gates.
    #[inline]
    pub fn with_anchor(mut self, anchor: &'a Assignment) -> Self {
        self.anchor = Some(anchor);
        self
    }

    #[inline]
    pub fn with_buffer(mut self, buffer: TimeDelta<i64>) -> Self {
        self.buffer = buffer;
        self
    }

    #[inline]
    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    #[inline]
    pub fn flights(&self) -> &'a FlightContainer {
        self.flights
    }

    #[inline]
    pub fn gates(&self) -> &'a GateContainer {
        self.gates
    }

    #[inline]
    pub fn distances(&self) -> &'a DistanceMatrix {
        self.distances
    }

    #[inline]
    pub fn anchor(&self) -> Option<&'a Assignment> {
        self.anchor
    }

    #[inline]
    pub fn buffer(&self) -> TimeDelta<i64> {
        self.buffer
    }

    #[inline]
    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    pub fn model(&self) -> Result<SolverModel<'a>, SolveError> {
        Ok(SolverModel::new(
            self.flights,
            self.gates,
            self.distances,
            self.anchor,
            self.buffer,
        )?)
    }
}

/// Whether the search proved its result optimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    Optimal,
    BestEffort,
}

/// `Degraded` if at least one active flight was left without a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stability {
    Stable,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SearchStats {
    pub nodes: u64,
    pub improvements: u64,
    pub elapsed: Duration,
    pub opening: Option<Fitness>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveOutcome {
    assignment: Assignment,
    conflicts: ConflictSet,
    fitness: Fitness,
    status: SolveStatus,
    stats: SearchStats,
}

impl SolveOutcome {
    /// Materializes a choice vector. Conflicts are recomputed from the
    /// produced assignment rather than trusted from the search.
    pub(crate) fn from_choices(
        model: &SolverModel<'_>,
        choices: &[Option<GateIndex>],
        status: SolveStatus,
        stats: SearchStats,
    ) -> Self {
        let assignment = model.to_assignment(choices);
        let conflicts = ConflictDetector::new(model.buffer()).detect(&assignment, model.source());
        Self {
            assignment,
            conflicts,
            fitness: model.fitness_of(choices),
            status,
            stats,
        }
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
    pub fn fitness(&self) -> Fitness {
        self.fitness
    }

    #[inline]
    pub fn status(&self) -> SolveStatus {
        self.status
    }

    #[inline]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    #[inline]
    pub fn stability(&self) -> Stability {
        if self.conflicts.is_empty() {
            Stability::Stable
        } else {
            Stability::Degraded
        }
    }

    #[inline]
    pub fn is_degraded(&self) -> bool {
        self.stability() == Stability::Degraded
    }

    #[inline]
    pub fn into_parts(self) -> (Assignment, ConflictSet, Fitness, SolveStatus, SearchStats) {
        (
            self.assignment,
            self.conflicts,
            self.fitness,
            self.status,
            self.stats,
        )
    }
}

pub trait AssignmentSolver {
    fn name(&self) -> &str;

    fn solve(&self, request: &SolveRequest<'_>) -> Result<SolveOutcome, SolveError>;
}
