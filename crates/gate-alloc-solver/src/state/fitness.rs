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

use gate_alloc_core::prelude::Cost;
use serde::Serialize;

/// Objective value of an assignment, compared lexicographically:
/// fewer unresolved flights first, then lower movement cost, then fewer
/// flights moved off their reference gate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Fitness {
    pub unresolved: usize,
    pub cost: Cost,
    pub changed: usize,
}

impl Fitness {
    #[inline]
    pub const fn new(unresolved: usize, cost: Cost, changed: usize) -> Self {
        Self {
            unresolved,
            cost,
            changed,
        }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::new(0, 0, 0)
    }

    /// Worse than any reachable fitness.
    #[inline]
    pub const fn worst() -> Self {
        Self::new(usize::MAX, Cost::MAX, usize::MAX)
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.unresolved == 0
    }

    /// Fitness after placing one more flight at `cost`.
    #[inline]
    pub fn with_placement(&self, cost: Cost, changed: bool) -> Self {
        Self {
            unresolved: self.unresolved,
            cost: self.cost.saturating_add(cost),
            changed: self.changed + usize::from(changed),
        }
    }

    /// Fitness after leaving one more flight without a gate.
    #[inline]
    pub fn with_unresolved(&self) -> Self {
        Self {
            unresolved: self.unresolved + 1,
            ..*self
        }
    }

    #[inline]
    fn key(&self) -> (usize, Cost, usize) {
        (self.unresolved, self.cost, self.changed)
    }
}

impl PartialOrd for Fitness {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fitness {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key().cmp(&other.key())
    }
}

impl std::fmt::Display for Fitness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Fitness(unresolved: {}, cost: {}, changed: {})",
            self.unresolved, self.cost, self.changed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_dominates_cost() {
        assert!(Fitness::new(0, 1_000_000, 50) < Fitness::new(1, 0, 0));
    }

    #[test]
    fn test_cost_dominates_changed() {
        assert!(Fitness::new(0, 10, 9) < Fitness::new(0, 11, 0));
        assert!(Fitness::new(0, 10, 1) < Fitness::new(0, 10, 2));
    }

    #[test]
    fn test_incremental_updates() {
        let f = Fitness::zero()
            .with_placement(150, true)
            .with_placement(0, false)
            .with_unresolved();
        assert_eq!(f, Fitness::new(1, 150, 1));
        assert!(!f.is_feasible());
        assert!(f < Fitness::worst());
    }
}
