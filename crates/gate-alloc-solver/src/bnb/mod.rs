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
    greedy::GreedySolver,
    model::{
        index::{FlightIndex, GateIndex},
        solver_model::SolverModel,
    },
    monitor::search_monitor::{LifecycleMonitor, SearchMonitor},
    solver::{
        AssignmentSolver, SearchStats, SolveOutcome, SolveRequest, SolveStatus, err::SolveError,
    },
    state::fitness::Fitness,
};
use gate_alloc_core::prelude::TimePoint;
use std::time::Instant;

/// Exact depth-first branch and bound over flights in time order.
///
/// Each flight branches over its candidate gates, cheapest first, and
/// finally over staying unresolved. A gate is feasible for the next flight
/// iff the flight arrives no earlier than the gate's latest departure plus
/// the buffer. The greedy construction seeds the incumbent and a branch is
/// cut as soon as its optimistic bound can no longer beat it strictly, so
/// among equal optima the first one found in branch order is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BranchAndBoundSolver;

struct SearchResult {
    best: Vec<Option<GateIndex>>,
    completed: bool,
    nodes: u64,
    improvements: u64,
}

impl BranchAndBoundSolver {
    fn search(
        model: &SolverModel<'_>,
        opening: Vec<Option<GateIndex>>,
        monitor: &mut dyn SearchMonitor,
    ) -> SearchResult {
        let n = model.flights_len();
        let mut best = opening;
        let mut incumbent = model.fitness_of(&best);
        let mut nodes = 0u64;
        let mut improvements = 0u64;

        if n == 0 || incumbent == model.root_lower_bound() {
            return SearchResult {
                best,
                completed: true,
                nodes,
                improvements,
            };
        }

        let mut free_at: Vec<Option<TimePoint<i64>>> = vec![None; model.gates_len()];
        let mut saved: Vec<Option<TimePoint<i64>>> = vec![None; n];
        let mut choices: Vec<Option<GateIndex>> = vec![None; n];
        let mut cursor = vec![0usize; n];
        let mut partial = vec![Fitness::zero(); n + 1];
        let mut depth = 0usize;
        let mut completed = true;

        loop {
            if monitor.should_terminate_search() {
                completed = false;
                break;
            }

            let f = FlightIndex(depth);
            if let Some(g) = choices[depth].take() {
                free_at[g.get()] = saved[depth];
            }

            let candidates = model.candidates(f);
            let mut branch: Option<(Option<GateIndex>, Fitness)> = None;
            while cursor[depth] <= candidates.len() {
                let k = cursor[depth];
                cursor[depth] += 1;

                if k == candidates.len() {
                    let child = partial[depth].with_unresolved();
                    if model.lower_bound(depth + 1, child) < incumbent {
                        branch = Some((None, child));
                    }
                    break;
                }

                let g = candidates[k];
                let child = partial[depth].with_placement(model.cost(f, g), model.is_changed(f, g));
                if model.lower_bound(depth + 1, child) >= incumbent {
                    // Later candidates are no cheaper.
                    cursor[depth] = candidates.len();
                    continue;
                }
                if model.fits_after(f, free_at[g.get()]) {
                    branch = Some((Some(g), child));
                    break;
                }
            }

            let Some((choice, child)) = branch else {
                cursor[depth] = 0;
                if depth == 0 {
                    break;
                }
                depth -= 1;
                continue;
            };

            nodes += 1;
            monitor.on_node_expanded();
            if let Some(g) = choice {
                saved[depth] = free_at[g.get()];
                let departure = model.departure(f);
                free_at[g.get()] = Some(free_at[g.get()].map_or(departure, |t| t.max(departure)));
            }
            choices[depth] = choice;
            partial[depth + 1] = child;

            if depth + 1 == n {
                incumbent = child;
                best.clone_from(&choices);
                improvements += 1;
                monitor.on_incumbent_improved(&child);
                tracing::trace!(%incumbent, nodes, "improved incumbent");
            } else {
                depth += 1;
            }
        }

        SearchResult {
            best,
            completed,
            nodes,
            improvements,
        }
    }
}

impl AssignmentSolver for BranchAndBoundSolver {
    fn name(&self) -> &str {
        "BranchAndBoundSolver"
    }

    #[tracing::instrument(level = "debug", skip_all, fields(flights = request.flights().len()))]
    fn solve(&self, request: &SolveRequest<'_>) -> Result<SolveOutcome, SolveError> {
        let started = Instant::now();
        let model = request.model()?;
        let mut monitor = request.limits().build_monitor();

        let opening = GreedySolver::construct(&model);
        let opening_fitness = model.fitness_of(&opening);

        monitor.on_search_start();
        let result = Self::search(&model, opening, &mut monitor);
        monitor.on_search_end();

        let fitness = model.fitness_of(&result.best);
        let status = if result.completed || fitness == model.root_lower_bound() {
            SolveStatus::Optimal
        } else {
            SolveStatus::BestEffort
        };
        let stats = SearchStats {
            nodes: result.nodes,
            improvements: result.improvements,
            elapsed: started.elapsed(),
            opening: Some(opening_fitness),
        };

        match status {
            SolveStatus::Optimal => tracing::debug!(
                %fitness,
                nodes = stats.nodes,
                elapsed_ms = stats.elapsed.as_millis() as u64,
                "search proved optimality"
            ),
            SolveStatus::BestEffort => tracing::warn!(
                %fitness,
                nodes = stats.nodes,
                elapsed_ms = stats.elapsed.as_millis() as u64,
                "search budget exhausted, returning best effort"
            ),
        }

        Ok(SolveOutcome::from_choices(&model, &result.best, status, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::limits::SearchLimits;
    use gate_alloc_core::prelude::{TimeDelta, TimeInterval};
    use gate_alloc_model::prelude::{
        AssignmentValidator, DistanceMatrix, Flight, FlightContainer, FlightIdentifier,
        FlightStatus, Gate, GateContainer, GateIdentifier, Location,
    };
    use std::time::Duration;

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

    fn gates(ids: &[&str]) -> GateContainer {
        ids.iter()
            .enumerate()
            .map(|(i, id)| Gate::new(gid(id), Location::Planar([i as f64, 0.0]), true))
            .collect()
    }

    fn distances(pairs: &[(&str, &str, i64)]) -> DistanceMatrix {
        let mut d = DistanceMatrix::new();
        for (a, b, c) in pairs {
            d.insert(&gid(a), &gid(b), *c);
        }
        d
    }

    /// B's own gate is closed and G1 is its only cheap alternative. Greedy
    /// keeps A on G1 and pushes B far away; moving A to G2 frees G1 for B.
    fn greedy_trap() -> (FlightContainer, GateContainer, DistanceMatrix) {
        let flights: FlightContainer =
            vec![flight("A", 600, 700, "G1"), flight("B", 650, 750, "G3")]
                .into_iter()
                .collect();
        let g: GateContainer = vec![
            Gate::new(gid("G1"), Location::Planar([0.0, 0.0]), true),
            Gate::new(gid("G2"), Location::Planar([1.0, 0.0]), true),
            Gate::new(gid("G3"), Location::Planar([2.0, 0.0]), false),
        ]
        .into_iter()
        .collect();
        let d = distances(&[("G1", "G2", 10), ("G1", "G3", 5), ("G2", "G3", 500)]);
        (flights, g, d)
    }

    #[test]
    fn test_beats_greedy_on_trap() {
        let (f, g, d) = greedy_trap();
        let request = SolveRequest::new(&f, &g, &d).with_limits(SearchLimits::unbounded());
        let greedy = GreedySolver.solve(&request).unwrap();
        let exact = BranchAndBoundSolver.solve(&request).unwrap();
        assert_eq!(greedy.fitness(), Fitness::new(0, 500, 1));
        assert_eq!(exact.fitness(), Fitness::new(0, 15, 2));
        assert!(exact.is_optimal());
        assert_eq!(exact.assignment().gate_of(&fid("A")), Some(&gid("G2")));
        assert_eq!(exact.assignment().gate_of(&fid("B")), Some(&gid("G1")));
        assert_eq!(exact.stats().opening, Some(greedy.fitness()));
        assert!(exact.stats().improvements >= 1);
    }

    #[test]
    fn test_result_satisfies_hard_constraints() {
        let (f, g, d) = greedy_trap();
        let buffer = TimeDelta::new(15);
        let request = SolveRequest::new(&f, &g, &d)
            .with_buffer(buffer)
            .with_limits(SearchLimits::unbounded());
        let out = BranchAndBoundSolver.solve(&request).unwrap();
        assert!(AssignmentValidator::validate_stable(out.assignment(), &f, &g, buffer).is_ok());
    }

    #[test]
    fn test_minimizes_unresolved_first() {
        let flights: FlightContainer = vec![
            flight("A", 600, 700, "G1"),
            flight("B", 610, 710, "G1"),
            flight("C", 620, 720, "G1"),
        ]
        .into_iter()
        .collect();
        let g = gates(&["G1", "G2"]);
        let d = distances(&[("G1", "G2", 100)]);
        let out = BranchAndBoundSolver
            .solve(&SolveRequest::new(&flights, &g, &d).with_limits(SearchLimits::unbounded()))
            .unwrap();
        assert_eq!(out.fitness(), Fitness::new(1, 100, 1));
        assert_eq!(out.conflicts().unresolved().len(), 1);
        assert!(out.conflicts().overlaps().is_empty());
        assert!(out.is_optimal());
        assert!(out.is_degraded());
    }

    #[test]
    fn test_zero_budget_returns_greedy_as_best_effort() {
        let (f, g, d) = greedy_trap();
        let limits = SearchLimits::unbounded().with_max_duration(Some(Duration::ZERO));
        let out = BranchAndBoundSolver
            .solve(&SolveRequest::new(&f, &g, &d).with_limits(limits))
            .unwrap();
        assert_eq!(out.status(), SolveStatus::BestEffort);
        assert_eq!(out.fitness(), Fitness::new(0, 500, 1));
        assert!(AssignmentValidator::validate_hard(out.assignment(), &f, &g, TimeDelta::new(0)).is_ok());
    }

    #[test]
    fn test_node_limit_cuts_search() {
        let (f, g, d) = greedy_trap();
        let limits = SearchLimits::unbounded().with_max_nodes(Some(1));
        let out = BranchAndBoundSolver
            .solve(&SolveRequest::new(&f, &g, &d).with_limits(limits))
            .unwrap();
        assert_eq!(out.status(), SolveStatus::BestEffort);
        assert_eq!(out.stats().nodes, 1);
    }

    #[test]
    fn test_empty_instance_is_trivially_optimal() {
        let f = FlightContainer::new();
        let g = gates(&["G1"]);
        let d = DistanceMatrix::new();
        let out = BranchAndBoundSolver
            .solve(&SolveRequest::new(&f, &g, &d))
            .unwrap();
        assert!(out.assignment().is_empty());
        assert!(out.is_optimal());
    }

    #[test]
    fn test_anchor_keeps_previous_placement() {
        let flights: FlightContainer =
            vec![flight("A", 600, 700, "G1")].into_iter().collect();
        let g = gates(&["G1", "G2"]);
        let d = distances(&[("G1", "G2", 100)]);
        let anchor: gate_alloc_model::prelude::Assignment =
            vec![(fid("A"), gid("G2"))].into_iter().collect();
        let out = BranchAndBoundSolver
            .solve(&SolveRequest::new(&flights, &g, &d).with_anchor(&anchor))
            .unwrap();
        assert_eq!(out.assignment().gate_of(&fid("A")), Some(&gid("G2")));
        assert_eq!(out.fitness(), Fitness::zero());
    }

    #[test]
    fn test_capacity_shortfall_is_proved_without_search() {
        let ids = ["G1", "G2", "G3", "G4", "G5", "G6", "G7", "G8"];
        let flights: FlightContainer = ids
            .iter()
            .enumerate()
            .map(|(i, g)| flight(&format!("F{i}"), 600, 700, g))
            .collect();
        // G8 is closed, so its flight has nowhere to go.
        let g: GateContainer = ids
            .iter()
            .enumerate()
            .map(|(i, id)| Gate::new(gid(id), Location::Planar([i as f64, 0.0]), i < 7))
            .collect();
        let mut d = DistanceMatrix::new();
        for (i, a) in ids.iter().enumerate() {
            for (j, b) in ids.iter().enumerate().skip(i + 1) {
                d.insert(&gid(a), &gid(b), ((j - i) * 10) as i64);
            }
        }
        let limits = SearchLimits::unbounded().with_max_nodes(Some(1_000));
        let out = BranchAndBoundSolver
            .solve(&SolveRequest::new(&flights, &g, &d).with_limits(limits))
            .unwrap();
        assert!(out.is_optimal());
        assert_eq!(out.fitness(), Fitness::new(1, 0, 0));
        assert_eq!(out.stats().nodes, 0);
        assert_eq!(out.conflicts().unresolved(), &[fid("F7")]);
    }
}
