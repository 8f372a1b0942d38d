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
use std::collections::BTreeSet;

/// Two flights whose windows collide on the same gate. `first` is the
/// earlier flight in `(arrival, departure, id)` order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Overlap {
    pub gate: GateIdentifier,
    pub first: FlightIdentifier,
    pub second: FlightIdentifier,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictSet {
    overlaps: Vec<Overlap>,
    unresolved: Vec<FlightIdentifier>,
}

impl ConflictSet {
    /// Both lists are sorted so equal conflict sets compare equal.
    #[inline]
    pub fn new(mut overlaps: Vec<Overlap>, mut unresolved: Vec<FlightIdentifier>) -> Self {
        overlaps.sort();
        overlaps.dedup();
        unresolved.sort();
        unresolved.dedup();
        Self {
            overlaps,
            unresolved,
        }
    }

    #[inline]
    pub fn overlaps(&self) -> &[Overlap] {
        &self.overlaps
    }

    #[inline]
    pub fn unresolved(&self) -> &[FlightIdentifier] {
        &self.unresolved
    }

    #[inline]
    pub fn has_overlaps(&self) -> bool {
        !self.overlaps.is_empty()
    }

    #[inline]
    pub fn has_unresolved(&self) -> bool {
        !self.unresolved.is_empty()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.overlaps.is_empty() && self.unresolved.is_empty()
    }

    /// Gates carrying at least one overlap.
    pub fn conflicting_gates(&self) -> BTreeSet<&GateIdentifier> {
        self.overlaps.iter().map(|o| &o.gate).collect()
    }

    /// Flights taking part in at least one overlap.
    pub fn conflicting_flights(&self) -> BTreeSet<&FlightIdentifier> {
        self.overlaps
            .iter()
            .flat_map(|o| [&o.first, &o.second])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ov(g: &str, a: &str, b: &str) -> Overlap {
        Overlap {
            gate: GateIdentifier::from(g),
            first: FlightIdentifier::from(a),
            second: FlightIdentifier::from(b),
        }
    }

    #[test]
    fn test_new_sorts_and_dedups() {
        let c = ConflictSet::new(
            vec![ov("G2", "A", "B"), ov("G1", "C", "D"), ov("G2", "A", "B")],
            vec![FlightIdentifier::from("Z"), FlightIdentifier::from("Y")],
        );
        assert_eq!(c.overlaps(), &[ov("G1", "C", "D"), ov("G2", "A", "B")]);
        assert_eq!(
            c.unresolved(),
            &[FlightIdentifier::from("Y"), FlightIdentifier::from("Z")]
        );
    }

    #[test]
    fn test_queries() {
        let c = ConflictSet::new(vec![ov("G1", "A", "B"), ov("G1", "A", "C")], vec![]);
        assert!(c.has_overlaps());
        assert!(!c.has_unresolved());
        assert_eq!(c.conflicting_gates().len(), 1);
        assert_eq!(c.conflicting_flights().len(), 3);
        assert!(ConflictSet::default().is_empty());
    }
}
