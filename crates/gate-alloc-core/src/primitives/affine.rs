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

use num_traits::{CheckedAdd, CheckedNeg, CheckedSub, SaturatingAdd, SaturatingSub, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    iter::Sum,
    marker::PhantomData,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

pub trait MarkerName {
    const NAME_POINT: &'static str;
    const NAME_DELTA: &'static str;
}

/// A position on a one-dimensional axis tagged with the unit `U`.
///
/// Points can only be shifted by a [`Delta`] of the same unit, and the
/// difference of two points is a delta. Arithmetic panics on overflow;
/// use the `checked_*` or `saturating_*` variants where inputs are untrusted.
#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point<T, U>(T, PhantomData<U>);

impl<T, U> Point<T, U> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Point(value, PhantomData)
    }

    #[inline]
    pub const fn value(&self) -> T
    where
        T: Copy,
    {
        self.0
    }

    #[inline]
    pub fn checked_add(self, d: Delta<T, U>) -> Option<Self>
    where
        T: CheckedAdd,
    {
        self.0.checked_add(&d.0).map(Point::new)
    }

    #[inline]
    pub fn checked_sub(self, d: Delta<T, U>) -> Option<Self>
    where
        T: CheckedSub,
    {
        self.0.checked_sub(&d.0).map(Point::new)
    }

    #[inline]
    pub fn saturating_add(self, d: Delta<T, U>) -> Self
    where
        T: SaturatingAdd,
    {
        Point::new(self.0.saturating_add(&d.0))
    }

    #[inline]
    pub fn saturating_sub(self, d: Delta<T, U>) -> Self
    where
        T: SaturatingSub,
    {
        Point::new(self.0.saturating_sub(&d.0))
    }
}

impl<T: std::fmt::Display, U: MarkerName> std::fmt::Display for Point<T, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME_POINT, self.0)
    }
}

impl<T: Zero, U> Default for Point<T, U> {
    #[inline]
    fn default() -> Self {
        Point::new(T::zero())
    }
}

impl<T: Serialize, U> Serialize for Point<T, U> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>, U> Deserialize<'de> for Point<T, U> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Point::new)
    }
}

impl<T: CheckedAdd, U> Add<Delta<T, U>> for Point<T, U> {
    type Output = Point<T, U>;

    #[inline]
    fn add(self, rhs: Delta<T, U>) -> Self::Output {
        Point::new(self.0.checked_add(&rhs.0).expect("overflow in Point + Delta"))
    }
}

impl<T: CheckedAdd, U> AddAssign<Delta<T, U>> for Point<T, U> {
    #[inline]
    fn add_assign(&mut self, rhs: Delta<T, U>) {
        self.0 = self.0.checked_add(&rhs.0).expect("overflow in Point += Delta");
    }
}

impl<T: CheckedSub, U> Sub<Delta<T, U>> for Point<T, U> {
    type Output = Point<T, U>;

    #[inline]
    fn sub(self, rhs: Delta<T, U>) -> Self::Output {
        Point::new(self.0.checked_sub(&rhs.0).expect("overflow in Point - Delta"))
    }
}

impl<T: CheckedSub, U> SubAssign<Delta<T, U>> for Point<T, U> {
    #[inline]
    fn sub_assign(&mut self, rhs: Delta<T, U>) {
        self.0 = self.0.checked_sub(&rhs.0).expect("overflow in Point -= Delta");
    }
}

impl<T: CheckedSub, U> Sub for Point<T, U> {
    type Output = Delta<T, U>;

    #[inline]
    fn sub(self, rhs: Point<T, U>) -> Self::Output {
        Delta::new(self.0.checked_sub(&rhs.0).expect("overflow in Point - Point"))
    }
}

/// A signed distance between two [`Point`]s of unit `U`.
#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Delta<T, U>(T, PhantomData<U>);

impl<T, U> Delta<T, U> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Delta(value, PhantomData)
    }

    #[inline]
    pub const fn value(self) -> T
    where
        T: Copy,
    {
        self.0
    }

    #[inline]
    pub fn is_positive(&self) -> bool
    where
        T: Zero + PartialOrd,
    {
        self.0 > T::zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool
    where
        T: Zero + PartialOrd,
    {
        self.0 < T::zero()
    }
}

impl<T: std::fmt::Display, U: MarkerName> std::fmt::Display for Delta<T, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME_DELTA, self.0)
    }
}

impl<T: Zero, U> Default for Delta<T, U> {
    #[inline]
    fn default() -> Self {
        Delta::new(T::zero())
    }
}

impl<T: Zero + CheckedAdd, U> Zero for Delta<T, U> {
    #[inline]
    fn zero() -> Self {
        Delta::new(T::zero())
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl<T, U> From<T> for Delta<T, U> {
    #[inline]
    fn from(v: T) -> Self {
        Delta::new(v)
    }
}

impl<T: Serialize, U> Serialize for Delta<T, U> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>, U> Deserialize<'de> for Delta<T, U> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Delta::new)
    }
}

impl<T: CheckedAdd, U> Add for Delta<T, U> {
    type Output = Delta<T, U>;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Delta::new(self.0.checked_add(&rhs.0).expect("overflow in Delta + Delta"))
    }
}

impl<T: CheckedAdd, U> AddAssign for Delta<T, U> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.checked_add(&rhs.0).expect("overflow in Delta += Delta");
    }
}

impl<T: CheckedAdd, U> CheckedAdd for Delta<T, U> {
    #[inline]
    fn checked_add(&self, rhs: &Self) -> Option<Self> {
        self.0.checked_add(&rhs.0).map(Delta::new)
    }
}

impl<T: CheckedSub, U> Sub for Delta<T, U> {
    type Output = Delta<T, U>;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Delta::new(self.0.checked_sub(&rhs.0).expect("overflow in Delta - Delta"))
    }
}

impl<T: CheckedNeg, U> Neg for Delta<T, U> {
    type Output = Delta<T, U>;

    #[inline]
    fn neg(self) -> Self::Output {
        Delta::new(self.0.checked_neg().expect("overflow in -Delta"))
    }
}

impl<T: Zero + CheckedAdd, U> Sum for Delta<T, U> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Delta::zero(), |acc, d| acc + d)
    }
}
