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

use crate::primitives::affine::{Delta, Point};
use num_traits::{CheckedAdd, CheckedSub};
use serde::{Deserialize, Serialize};

/// A half-open interval `[start, end)`.
///
/// Two intervals that merely touch (`a.end == b.start`) do not intersect.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval<P> {
    start: P,
    end: P,
}

impl<P: Ord + Copy> Interval<P> {
    /// Panics if `start > end`.
    #[inline]
    pub fn new(start: P, end: P) -> Self {
        assert!(start <= end, "interval start must not exceed its end");
        Self { start, end }
    }

    #[inline]
    pub fn try_new(start: P, end: P) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    #[inline]
    pub fn start(&self) -> P {
        self.start
    }

    #[inline]
    pub fn end(&self) -> P {
        self.end
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn contains(&self, p: P) -> bool {
        self.start <= p && p < self.end
    }

    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    #[inline]
    pub fn into_inner(self) -> (P, P) {
        (self.start, self.end)
    }

    #[inline]
    pub fn into_range(self) -> std::ops::Range<P> {
        self.start..self.end
    }
}

impl<T, U> Interval<Point<T, U>>
where
    T: Copy + Ord + CheckedAdd + CheckedSub,
    U: Copy,
{
    #[inline]
    pub fn length(&self) -> Delta<T, U> {
        self.end - self.start
    }

    /// Moves both ends by `d`, keeping the length. `None` on overflow.
    #[inline]
    pub fn checked_shift(&self, d: Delta<T, U>) -> Option<Self> {
        Some(Self {
            start: self.start.checked_add(d)?,
            end: self.end.checked_add(d)?,
        })
    }
}

impl<P: std::fmt::Display> std::fmt::Display for Interval<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
