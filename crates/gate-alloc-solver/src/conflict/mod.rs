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

use gate_alloc_core::prelude::TimeDelta;
use gate_alloc_model::prelude::{
    Assignment, ConflictSet, Flight, FlightContainer, GateIdentifier, Overlap,
};
use num_traits::Zero;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Finds every pair of flights that collide on a shared gate, plus the
/// active flights that hold no gate at all.
///
/// Gates are swept independently and in parallel. Per gate the flights are
/// ordered by `(arrival, departure, id)`; a sweep keeps the flights whose
/// occupancy (plus buffer) still reaches the current arrival, and every
/// one of those collides with it. Cost is `O(F log F + K)` per gate for `K`
/// reported pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictDetector {
    buffer: TimeDelta<i64>,
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new(TimeDelta::zero())
    }
}

impl ConflictDetector {
    #[inline]
    pub fn new(buffer: TimeDelta<i64>) -> Self {
        Self { buffer }
    }

    #[inline]
    pub fn buffer(&self) -> TimeDelta<i64> {
        self.buffer
    }

    /// Flights in the assignment that are unknown or cancelled are ignored.
    pub fn detect(&self, assignment: &Assignment, flights: &FlightContainer) -> ConflictSet {
        let mut by_gate: BTreeMap<&GateIdentifier, Vec<&Flight>> = BTreeMap::new();
        for (fid, gid) in assignment.iter() {
            if let Some(f) = flights.get(fid).filter(|f| f.is_active()) {
                by_gate.entry(gid).or_default().push(f);
            }
        }

        let groups: Vec<(&GateIdentifier, Vec<&Flight>)> = by_gate.into_iter().collect();
        let overlaps: Vec<Overlap> = groups
            .into_par_iter()
            .flat_map_iter(|(gate, on_gate)| self.sweep_gate(gate, on_gate))
            .collect();

        let unresolved = flights
            .iter_active()
            .filter(|f| !assignment.contains(f.id()))
            .map(|f| f.id().clone())
            .collect();

        let conflicts = ConflictSet::new(overlaps, unresolved);
        tracing::trace!(
            overlaps = conflicts.overlaps().len(),
            unresolved = conflicts.unresolved().len(),
            "conflict detection finished"
        );
        conflicts
    }

    fn sweep_gate(&self, gate: &GateIdentifier, mut on_gate: Vec<&Flight>) -> Vec<Overlap> {
        on_gate.sort_by(|a, b| a.time_order_key().cmp(&b.time_order_key()));

        let mut found = Vec::new();
        let mut occupying: Vec<&Flight> = Vec::new();
        for current in on_gate {
            occupying.retain(|p| current.arrival() < p.departure().saturating_add(self.buffer));
            for earlier in &occupying {
                found.push(Overlap {
                    gate: gate.clone(),
                    first: earlier.id().clone(),
                    second: current.id().clone(),
                });
            }
            occupying.push(current);
        }
        found
    }
}
