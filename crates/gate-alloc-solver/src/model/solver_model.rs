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
    model::{
        err::MissingCostError,
        index::{FlightIndex, GateIndex},
    },
    state::fitness::Fitness,
};
use gate_alloc_core::prelude::{Cost, TimeDelta, TimePoint};
use gate_alloc_model::prelude::{
    Assignment, DistanceMatrix, Flight, FlightContainer, GateContainer, GateIdentifier,
};
use std::collections::BTreeMap;

/// Dense view of one solve.
///
/// Active flights are kept in `(arrival, departure, id)` order and open
/// gates in id order; everything else is indexed by those positions. The
/// reference gate of a flight is its anchor gate when an anchor assignment
/// is given and holds the flight, otherwise its original gate.
#[derive(Debug, Clone)]
pub struct SolverModel<'a> {
    source: &'a FlightContainer,
    flights: Vec<&'a Flight>,
    gates: Vec<&'a GateIdentifier>,
    references: Vec<&'a GateIdentifier>,
    costs: Vec<Cost>,
    candidates: Vec<Vec<GateIndex>>,
    suffix_cost: Vec<Cost>,
    suffix_changed: Vec<usize>,
    suffix_forced: Vec<usize>,
    buffer: TimeDelta<i64>,
}

impl<'a> SolverModel<'a> {
    pub fn new(
        flights: &'a FlightContainer,
        gates: &'a GateContainer,
        distances: &DistanceMatrix,
        anchor: Option<&'a Assignment>,
        buffer: TimeDelta<i64>,
    ) -> Result<Self, MissingCostError> {
        let ordered = flights.active_in_time_order();
        let open: Vec<&'a GateIdentifier> = gates.iter_open().map(|g| g.id()).collect();
        let references: Vec<&'a GateIdentifier> = ordered
            .iter()
            .map(|f| {
                anchor
                    .and_then(|a| a.gate_of(f.id()))
                    .unwrap_or_else(|| f.original_gate())
            })
            .collect();

        let mut costs = Vec::with_capacity(ordered.len() * open.len());
        for reference in &references {
            for gate in &open {
                let cost = distances
                    .cost(reference, gate)
                    .ok_or_else(|| MissingCostError::new((*reference).clone(), (*gate).clone()))?;
                costs.push(cost);
            }
        }

        let width = open.len();
        let candidates: Vec<Vec<GateIndex>> = references
            .iter()
            .enumerate()
            .map(|(fi, reference)| {
                let mut row: Vec<GateIndex> = (0..width).map(GateIndex).collect();
                row.sort_by_key(|g| {
                    (
                        costs[fi * width + g.0],
                        open[g.0] != *reference,
                        g.0,
                    )
                });
                row
            })
            .collect();

        // Per suffix: cheapest placement of every flight, minus the flights
        // that gate capacity or missing gates force out of the plan.
        let n = ordered.len();
        let congestion = Self::suffix_congestion(&ordered, buffer);
        let mut suffix_cost: Vec<Cost> = vec![0; n + 1];
        let mut suffix_changed = vec![0; n + 1];
        let mut suffix_forced = vec![0; n + 1];
        let mut total_cost: Cost = 0;
        let mut total_changed = 0usize;
        // Cheapest cost of each placeable suffix flight, ascending.
        let mut cheapest: Vec<Cost> = Vec::with_capacity(n);
        for fi in (0..n).rev() {
            if let Some(min) = costs[fi * width..(fi + 1) * width].iter().min().copied() {
                total_cost = total_cost.saturating_add(min);
                total_changed += usize::from(!open.contains(&references[fi]));
                let at = cheapest.partition_point(|c| *c < min);
                cheapest.insert(at, min);
            }
            let stranded = (n - fi) - cheapest.len();
            let crowded = congestion[fi].saturating_sub(width).min(cheapest.len());
            let dropped: Cost = cheapest.iter().rev().take(crowded).sum();
            suffix_forced[fi] = stranded + crowded;
            suffix_cost[fi] = total_cost.saturating_sub(dropped);
            suffix_changed[fi] = total_changed.saturating_sub(crowded);
        }

        tracing::debug!(
            flights = n,
            open_gates = width,
            anchored = anchor.is_some(),
            "built solver model"
        );

        Ok(Self {
            source: flights,
            flights: ordered,
            gates: open,
            references,
            costs,
            candidates,
            suffix_cost,
            suffix_changed,
            suffix_forced,
            buffer,
        })
    }

    /// For every suffix of the time-ordered flights, the largest number of
    /// its flights that share one instant and so need pairwise distinct
    /// gates.
    fn suffix_congestion(ordered: &[&Flight], buffer: TimeDelta<i64>) -> Vec<usize> {
        let n = ordered.len();
        // covering[k]: suffix flights present at the arrival of flight k.
        let mut covering = vec![0usize; n];
        let mut congestion = vec![0usize; n + 1];
        for fi in (0..n).rev() {
            let until = ordered[fi].departure().saturating_add(buffer);
            let mut peak = congestion[fi + 1];
            for (count, next) in covering[fi..].iter_mut().zip(&ordered[fi..]) {
                if next.arrival() >= until {
                    break;
                }
                *count += 1;
                peak = peak.max(*count);
            }
            congestion[fi] = peak;
        }
        congestion
    }

    #[inline]
    pub fn source(&self) -> &'a FlightContainer {
        self.source
    }

    #[inline]
    pub fn flights_len(&self) -> usize {
        self.flights.len()
    }

    #[inline]
    pub fn gates_len(&self) -> usize {
        self.gates.len()
    }

    #[inline]
    pub fn buffer(&self) -> TimeDelta<i64> {
        self.buffer
    }

    #[inline]
    pub fn flight(&self, f: FlightIndex) -> &'a Flight {
        self.flights[f.0]
    }

    #[inline]
    pub fn arrival(&self, f: FlightIndex) -> TimePoint<i64> {
        self.flights[f.0].arrival()
    }

    #[inline]
    pub fn departure(&self, f: FlightIndex) -> TimePoint<i64> {
        self.flights[f.0].departure()
    }

    #[inline]
    pub fn gate_id(&self, g: GateIndex) -> &'a GateIdentifier {
        self.gates[g.0]
    }

    #[inline]
    pub fn reference(&self, f: FlightIndex) -> &'a GateIdentifier {
        self.references[f.0]
    }

    #[inline]
    pub fn cost(&self, f: FlightIndex, g: GateIndex) -> Cost {
        self.costs[f.0 * self.gates.len() + g.0]
    }

    #[inline]
    pub fn is_changed(&self, f: FlightIndex, g: GateIndex) -> bool {
        self.gates[g.0] != self.references[f.0]
    }

    /// Open gates for `f`, cheapest first; ties keep the reference gate
    /// ahead, then id order.
    #[inline]
    pub fn candidates(&self, f: FlightIndex) -> &[GateIndex] {
        &self.candidates[f.0]
    }

    /// True if `f` may follow the flights already on a gate that is busy
    /// until `free_at`. Exact when flights are placed in model order.
    #[inline]
    pub fn fits_after(&self, f: FlightIndex, free_at: Option<TimePoint<i64>>) -> bool {
        match free_at {
            None => true,
            Some(t) => self.arrival(f) >= t.saturating_add(self.buffer),
        }
    }

    /// Optimistic fitness of any completion of a partial assignment that
    /// has fixed the first `depth` flights at `partial`.
    #[inline]
    pub fn lower_bound(&self, depth: usize, partial: Fitness) -> Fitness {
        Fitness::new(
            partial.unresolved + self.suffix_forced[depth],
            partial.cost.saturating_add(self.suffix_cost[depth]),
            partial.changed + self.suffix_changed[depth],
        )
    }

    #[inline]
    pub fn root_lower_bound(&self) -> Fitness {
        self.lower_bound(0, Fitness::zero())
    }

    /// Fitness of a full choice vector, one entry per flight in model order.
    pub fn fitness_of(&self, choices: &[Option<GateIndex>]) -> Fitness {
        choices
            .iter()
            .enumerate()
            .fold(Fitness::zero(), |acc, (fi, choice)| match choice {
                Some(g) => {
                    let f = FlightIndex(fi);
                    acc.with_placement(self.cost(f, *g), self.is_changed(f, *g))
                }
                None => acc.with_unresolved(),
            })
    }

    pub fn to_assignment(&self, choices: &[Option<GateIndex>]) -> Assignment {
        let mapping: BTreeMap<_, _> = choices
            .iter()
            .enumerate()
            .filter_map(|(fi, choice)| {
                choice.map(|g| (self.flights[fi].id().clone(), self.gates[g.0].clone()))
            })
            .collect();
        Assignment::from_mapping(Default::default(), mapping)
    }
}
