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

use crate::problem::gate::GateIdentifier;
use gate_alloc_core::prelude::Cost;
use std::collections::BTreeMap;

/// Symmetric movement cost between gates, in scaled [`Cost`] units.
///
/// Pairs are stored once under their ordered key; the diagonal is implicit
/// and always zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistanceMatrix {
    costs: BTreeMap<(GateIdentifier, GateIdentifier), Cost>,
}

#[inline]
fn key(a: &GateIdentifier, b: &GateIdentifier) -> (GateIdentifier, GateIdentifier) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

impl DistanceMatrix {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the cost for the unordered pair `{a, b}` and returns the
    /// previous value. Self pairs are ignored.
    #[inline]
    pub fn insert(&mut self, a: &GateIdentifier, b: &GateIdentifier, cost: Cost) -> Option<Cost> {
        if a == b {
            return None;
        }
        self.costs.insert(key(a, b), cost)
    }

    #[inline]
    pub fn cost(&self, a: &GateIdentifier, b: &GateIdentifier) -> Option<Cost> {
        if a == b {
            return Some(0);
        }
        self.costs.get(&key(a, b)).copied()
    }

    #[inline]
    pub fn contains_pair(&self, a: &GateIdentifier, b: &GateIdentifier) -> bool {
        self.cost(a, b).is_some()
    }

    /// Number of stored off-diagonal pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&GateIdentifier, &GateIdentifier, Cost)> {
        self.costs.iter().map(|((a, b), c)| (a, b, *c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gid(s: &str) -> GateIdentifier {
        GateIdentifier::from(s)
    }

    #[test]
    fn test_symmetric_lookup() {
        let mut m = DistanceMatrix::new();
        assert_eq!(m.insert(&gid("G2"), &gid("G1"), 350), None);
        assert_eq!(m.cost(&gid("G1"), &gid("G2")), Some(350));
        assert_eq!(m.cost(&gid("G2"), &gid("G1")), Some(350));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_diagonal_is_zero_and_not_stored() {
        let mut m = DistanceMatrix::new();
        assert_eq!(m.cost(&gid("G1"), &gid("G1")), Some(0));
        assert_eq!(m.insert(&gid("G1"), &gid("G1"), 10), None);
        assert!(m.is_empty());
    }

    #[test]
    fn test_missing_pair() {
        let m = DistanceMatrix::new();
        assert_eq!(m.cost(&gid("G1"), &gid("G2")), None);
        assert!(!m.contains_pair(&gid("G1"), &gid("G2")));
    }

    #[test]
    fn test_insert_returns_previous() {
        let mut m = DistanceMatrix::new();
        m.insert(&gid("A"), &gid("B"), 1);
        assert_eq!(m.insert(&gid("B"), &gid("A"), 2), Some(1));
        let all: Vec<_> = m.iter().map(|(a, b, c)| (a.as_str(), b.as_str(), c)).collect();
        assert_eq!(all, vec![("A", "B", 2)]);
    }
}
