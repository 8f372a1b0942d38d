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
    common::{Identifier, IdentifierMarkerName},
    problem::{err::DelayOutOfRangeError, gate::GateIdentifier},
};
use gate_alloc_core::prelude::{TimeDelta, TimeInterval, TimePoint};
use num_traits::{CheckedAdd, Zero};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlightIdentifierMarker;

impl IdentifierMarkerName for FlightIdentifierMarker {
    const NAME: &'static str = "FlightId";
}

pub type FlightIdentifier = Identifier<String, FlightIdentifierMarker>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightStatus {
    #[default]
    Scheduled,
    Delayed,
    Cancelled,
}

impl std::fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlightStatus::Scheduled => write!(f, "scheduled"),
            FlightStatus::Delayed => write!(f, "delayed"),
            FlightStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Whether two gate occupancy windows collide under a turnaround `buffer`.
///
/// The windows are ordered by `(start, end)`; the later one collides with
/// the earlier one iff it starts before the earlier one ends plus the buffer.
/// Windows that merely touch do not collide when the buffer is zero.
#[inline]
pub fn windows_conflict(
    a: &TimeInterval<i64>,
    b: &TimeInterval<i64>,
    buffer: TimeDelta<i64>,
) -> bool {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    second.start() < first.end().saturating_add(buffer)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flight {
    id: FlightIdentifier,
    schedule: TimeInterval<i64>,
    delay: TimeDelta<i64>,
    window: TimeInterval<i64>,
    original_gate: GateIdentifier,
    status: FlightStatus,
}

impl Flight {
    #[inline]
    pub fn new(
        id: FlightIdentifier,
        schedule: TimeInterval<i64>,
        original_gate: GateIdentifier,
        status: FlightStatus,
    ) -> Self {
        Self {
            id,
            schedule,
            delay: TimeDelta::zero(),
            window: schedule,
            original_gate,
            status,
        }
    }

    #[inline]
    pub fn id(&self) -> &FlightIdentifier {
        &self.id
    }

    /// The published window, before any delay.
    #[inline]
    pub fn schedule(&self) -> TimeInterval<i64> {
        self.schedule
    }

    #[inline]
    pub fn delay(&self) -> TimeDelta<i64> {
        self.delay
    }

    /// The effective gate occupancy window: the schedule shifted by the accumulated delay.
    #[inline]
    pub fn window(&self) -> TimeInterval<i64> {
        self.window
    }

    #[inline]
    pub fn arrival(&self) -> TimePoint<i64> {
        self.window.start()
    }

    #[inline]
    pub fn departure(&self) -> TimePoint<i64> {
        self.window.end()
    }

    #[inline]
    pub fn original_gate(&self) -> &GateIdentifier {
        &self.original_gate
    }

    #[inline]
    pub fn status(&self) -> FlightStatus {
        self.status
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status != FlightStatus::Cancelled
    }

    /// Key used wherever flights are processed in time order.
    #[inline]
    pub fn time_order_key(&self) -> (TimePoint<i64>, TimePoint<i64>, &FlightIdentifier) {
        (self.arrival(), self.departure(), &self.id)
    }

    #[inline]
    pub fn conflicts_with(&self, other: &Flight, buffer: TimeDelta<i64>) -> bool {
        windows_conflict(&self.window, &other.window, buffer)
    }

    /// Adds `offset` to the accumulated delay and shifts the effective window.
    ///
    /// A non-zero net delay marks the flight `Delayed`; a net delay of zero
    /// restores `Scheduled`. Cancelled flights keep their status. On overflow
    /// the flight is left untouched.
    pub fn apply_delay(&mut self, offset: TimeDelta<i64>) -> Result<(), DelayOutOfRangeError> {
        let out_of_range = || DelayOutOfRangeError::new(self.id.clone(), offset);
        let delay = self.delay.checked_add(&offset).ok_or_else(out_of_range)?;
        let window = self.schedule.checked_shift(delay).ok_or_else(out_of_range)?;

        self.delay = delay;
        self.window = window;
        if self.status != FlightStatus::Cancelled {
            self.status = if delay.is_zero() {
                FlightStatus::Scheduled
            } else {
                FlightStatus::Delayed
            };
        }
        Ok(())
    }
}

/// Flights keyed by id. Iteration is in id order.
#[repr(transparent)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlightContainer(BTreeMap<FlightIdentifier, Flight>);

impl FlightContainer {
    #[inline]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[inline]
    pub fn insert(&mut self, flight: Flight) -> Option<Flight> {
        self.0.insert(flight.id().clone(), flight)
    }

    #[inline]
    pub fn get(&self, id: &FlightIdentifier) -> Option<&Flight> {
        self.0.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: &FlightIdentifier) -> Option<&mut Flight> {
        self.0.get_mut(id)
    }

    #[inline]
    pub fn contains_id(&self, id: &FlightIdentifier) -> bool {
        self.0.contains_key(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Flight> {
        self.0.values()
    }

    #[inline]
    pub fn iter_active(&self) -> impl Iterator<Item = &Flight> {
        self.0.values().filter(|f| f.is_active())
    }

    /// Active flights sorted by `(arrival, departure, id)`.
    pub fn active_in_time_order(&self) -> Vec<&Flight> {
        let mut v: Vec<&Flight> = self.iter_active().collect();
        v.sort_by(|a, b| a.time_order_key().cmp(&b.time_order_key()));
        v
    }
}

impl FromIterator<Flight> for FlightContainer {
    fn from_iter<I: IntoIterator<Item = Flight>>(iter: I) -> Self {
        let mut c = Self::new();
        for f in iter {
            c.insert(f);
        }
        c
    }
}

impl Serialize for FlightContainer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tp(v: i64) -> TimePoint<i64> {
        TimePoint::new(v)
    }

    fn iv(a: i64, b: i64) -> TimeInterval<i64> {
        TimeInterval::new(tp(a), tp(b))
    }

    fn td(v: i64) -> TimeDelta<i64> {
        TimeDelta::new(v)
    }

    fn flight(id: &str, a: i64, b: i64) -> Flight {
        Flight::new(
            FlightIdentifier::from(id),
            iv(a, b),
            GateIdentifier::from("G1"),
            FlightStatus::Scheduled,
        )
    }

    #[test]
    fn test_windows_conflict_overlap_and_touching() {
        assert!(windows_conflict(&iv(600, 630), &iv(615, 645), td(0)));
        assert!(windows_conflict(&iv(615, 645), &iv(600, 630), td(0)));
        assert!(!windows_conflict(&iv(600, 630), &iv(630, 660), td(0)));
        assert!(windows_conflict(&iv(600, 700), &iv(610, 620), td(0)));
    }

    #[test]
    fn test_windows_conflict_respects_buffer() {
        assert!(windows_conflict(&iv(600, 630), &iv(650, 700), td(30)));
        assert!(!windows_conflict(&iv(600, 630), &iv(660, 700), td(30)));
        assert!(!windows_conflict(&iv(660, 700), &iv(600, 630), td(30)));
    }

    #[test]
    fn test_windows_conflict_zero_length_at_start() {
        assert!(!windows_conflict(&iv(600, 630), &iv(600, 600), td(0)));
        assert!(windows_conflict(&iv(600, 630), &iv(610, 610), td(0)));
    }

    #[test]
    fn test_apply_delay_shifts_window_and_status() {
        let mut f = flight("F1", 600, 630);
        f.apply_delay(td(20)).unwrap();
        assert_eq!(f.window(), iv(620, 650));
        assert_eq!(f.schedule(), iv(600, 630));
        assert_eq!(f.status(), FlightStatus::Delayed);

        f.apply_delay(td(-20)).unwrap();
        assert_eq!(f.window(), iv(600, 630));
        assert_eq!(f.delay(), td(0));
        assert_eq!(f.status(), FlightStatus::Scheduled);
    }

    #[test]
    fn test_apply_delay_keeps_cancelled() {
        let mut f = Flight::new(
            FlightIdentifier::from("F1"),
            iv(0, 10),
            GateIdentifier::from("G1"),
            FlightStatus::Cancelled,
        );
        f.apply_delay(td(5)).unwrap();
        assert_eq!(f.status(), FlightStatus::Cancelled);
        assert!(!f.is_active());
    }

    #[test]
    fn test_apply_delay_overflow_leaves_flight_untouched() {
        let mut f = flight("F1", 0, i64::MAX - 1);
        let before = f.clone();
        assert!(f.apply_delay(td(10)).is_err());
        assert_eq!(f, before);
    }

    #[test]
    fn test_active_in_time_order_breaks_ties_by_id() {
        let c: FlightContainer = vec![
            flight("B", 600, 630),
            flight("A", 600, 630),
            flight("C", 590, 700),
        ]
        .into_iter()
        .collect();
        let order: Vec<&str> = c
            .active_in_time_order()
            .iter()
            .map(|f| f.id().as_str())
            .collect();
        assert_eq!(order, vec!["C", "A", "B"]);
    }
}
