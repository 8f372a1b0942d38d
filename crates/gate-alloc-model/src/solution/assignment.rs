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

use crate::problem::{flight::FlightIdentifier, gate::GateIdentifier};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Version of a committed assignment. Strictly increasing per store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Generation({})", self.0)
    }
}

/// One flight whose gate differs between two assignments.
///
/// `old_gate_id` is absent for a flight that had no gate before and
/// `new_gate_id` is absent for a flight that lost its gate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GateChange {
    pub flight_id: FlightIdentifier,
    pub old_gate_id: Option<GateIdentifier>,
    pub new_gate_id: Option<GateIdentifier>,
}

/// Flight to gate mapping at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    generation: Generation,
    gates: BTreeMap<FlightIdentifier, GateIdentifier>,
}

impl Assignment {
    #[inline]
    pub fn new(generation: Generation) -> Self {
        Self {
            generation,
            gates: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn from_mapping(
        generation: Generation,
        gates: BTreeMap<FlightIdentifier, GateIdentifier>,
    ) -> Self {
        Self { generation, gates }
    }

    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    #[inline]
    pub fn with_generation(mut self, generation: Generation) -> Self {
        self.generation = generation;
        self
    }

    #[inline]
    pub fn gate_of(&self, flight: &FlightIdentifier) -> Option<&GateIdentifier> {
        self.gates.get(flight)
    }

    #[inline]
    pub fn assign(&mut self, flight: FlightIdentifier, gate: GateIdentifier) -> Option<GateIdentifier> {
        self.gates.insert(flight, gate)
    }

    #[inline]
    pub fn unassign(&mut self, flight: &FlightIdentifier) -> Option<GateIdentifier> {
        self.gates.remove(flight)
    }

    #[inline]
    pub fn contains(&self, flight: &FlightIdentifier) -> bool {
        self.gates.contains_key(flight)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&FlightIdentifier, &GateIdentifier)> {
        self.gates.iter()
    }

    #[inline]
    pub fn flights_on<'a>(
        &'a self,
        gate: &'a GateIdentifier,
    ) -> impl Iterator<Item = &'a FlightIdentifier> + 'a {
        self.gates
            .iter()
            .filter(move |(_, g)| *g == gate)
            .map(|(f, _)| f)
    }

    /// Same mapping, ignoring generations.
    #[inline]
    pub fn same_mapping(&self, other: &Assignment) -> bool {
        self.gates == other.gates
    }

    /// Every flight whose gate differs in `next`, in flight id order.
    pub fn changes_to(&self, next: &Assignment) -> Vec<GateChange> {
        let flights: BTreeSet<&FlightIdentifier> =
            self.gates.keys().chain(next.gates.keys()).collect();
        flights
            .into_iter()
            .filter_map(|f| {
                let old = self.gates.get(f);
                let new = next.gates.get(f);
                (old != new).then(|| GateChange {
                    flight_id: f.clone(),
                    old_gate_id: old.cloned(),
                    new_gate_id: new.cloned(),
                })
            })
            .collect()
    }
}

impl FromIterator<(FlightIdentifier, GateIdentifier)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (FlightIdentifier, GateIdentifier)>>(iter: I) -> Self {
        Self::from_mapping(Generation::default(), iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fid(s: &str) -> FlightIdentifier {
        FlightIdentifier::from(s)
    }

    fn gid(s: &str) -> GateIdentifier {
        GateIdentifier::from(s)
    }

    fn asg(pairs: &[(&str, &str)]) -> Assignment {
        pairs.iter().map(|(f, g)| (fid(f), gid(g))).collect()
    }

    #[test]
    fn test_generation_next() {
        assert_eq!(Generation::new(4).next(), Generation::new(5));
        assert_eq!(Generation::new(u64::MAX).next(), Generation::new(u64::MAX));
    }

    #[test]
    fn test_assign_and_lookup() {
        let mut a = Assignment::new(Generation::new(1));
        assert_eq!(a.assign(fid("F1"), gid("G1")), None);
        assert_eq!(a.assign(fid("F1"), gid("G2")), Some(gid("G1")));
        assert_eq!(a.gate_of(&fid("F1")), Some(&gid("G2")));
        assert_eq!(a.unassign(&fid("F1")), Some(gid("G2")));
        assert!(a.is_empty());
    }

    #[test]
    fn test_flights_on_gate() {
        let a = asg(&[("F1", "G1"), ("F2", "G2"), ("F3", "G1")]);
        let g1 = gid("G1");
        let on: Vec<&str> = a.flights_on(&g1).map(|f| f.as_str()).collect();
        assert_eq!(on, vec!["F1", "F3"]);
    }

    #[test]
    fn test_changes_cover_moves_gains_and_losses() {
        let before = asg(&[("F1", "G1"), ("F2", "G2"), ("F3", "G3")]);
        let after = asg(&[("F1", "G1"), ("F2", "G4"), ("F4", "G3")]);
        let diff = before.changes_to(&after);
        assert_eq!(
            diff,
            vec![
                GateChange {
                    flight_id: fid("F2"),
                    old_gate_id: Some(gid("G2")),
                    new_gate_id: Some(gid("G4")),
                },
                GateChange {
                    flight_id: fid("F3"),
                    old_gate_id: Some(gid("G3")),
                    new_gate_id: None,
                },
                GateChange {
                    flight_id: fid("F4"),
                    old_gate_id: None,
                    new_gate_id: Some(gid("G3")),
                },
            ]
        );
    }

    #[test]
    fn test_same_mapping_ignores_generation() {
        let a = asg(&[("F1", "G1")]);
        let b = a.clone().with_generation(Generation::new(9));
        assert!(a.same_mapping(&b));
        assert_ne!(a, b);
        assert!(a.changes_to(&b).is_empty());
    }

    #[test]
    fn test_serialize_shape() {
        let a = asg(&[("F1", "G1")]).with_generation(Generation::new(3));
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"generation": 3, "gates": {"F1": "G1"}})
        );
    }
}
