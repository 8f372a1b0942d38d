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

use crate::common::{Identifier, IdentifierMarkerName};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GateIdentifierMarker;

impl IdentifierMarkerName for GateIdentifierMarker {
    const NAME: &'static str = "GateId";
}

pub type GateIdentifier = Identifier<String, GateIdentifierMarker>;

/// Stand position on the apron, planar or with elevation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Location {
    Planar([f64; 2]),
    Spatial([f64; 3]),
}

impl Location {
    /// Accepts two or three finite components.
    #[inline]
    pub fn from_slice(coordinates: &[f64]) -> Option<Self> {
        if coordinates.iter().any(|c| !c.is_finite()) {
            return None;
        }
        match coordinates {
            &[x, y] => Some(Location::Planar([x, y])),
            &[x, y, z] => Some(Location::Spatial([x, y, z])),
            _ => None,
        }
    }

    #[inline]
    pub fn coordinates(&self) -> &[f64] {
        match self {
            Location::Planar(c) => c,
            Location::Spatial(c) => c,
        }
    }

    /// Straight-line distance; a planar location is treated as lying at zero elevation.
    pub fn euclidean(&self, other: &Location) -> f64 {
        let a = self.padded();
        let b = other.padded();
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt()
    }

    #[inline]
    fn padded(&self) -> [f64; 3] {
        match *self {
            Location::Planar([x, y]) => [x, y, 0.0],
            Location::Spatial(c) => c,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gate {
    id: GateIdentifier,
    location: Location,
    open: bool,
}

impl Gate {
    #[inline]
    pub fn new(id: GateIdentifier, location: Location, open: bool) -> Self {
        Self { id, location, open }
    }

    #[inline]
    pub fn id(&self) -> &GateIdentifier {
        &self.id
    }

    #[inline]
    pub fn location(&self) -> &Location {
        &self.location
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        !self.open
    }

    #[inline]
    pub fn close(&mut self) {
        self.open = false;
    }
}

/// Gates keyed by id. Iteration is in id order.
#[repr(transparent)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GateContainer(BTreeMap<GateIdentifier, Gate>);

impl GateContainer {
    #[inline]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[inline]
    pub fn insert(&mut self, gate: Gate) -> Option<Gate> {
        self.0.insert(gate.id().clone(), gate)
    }

    #[inline]
    pub fn get(&self, id: &GateIdentifier) -> Option<&Gate> {
        self.0.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: &GateIdentifier) -> Option<&mut Gate> {
        self.0.get_mut(id)
    }

    #[inline]
    pub fn contains_id(&self, id: &GateIdentifier) -> bool {
        self.0.contains_key(id)
    }

    #[inline]
    pub fn is_open(&self, id: &GateIdentifier) -> bool {
        self.0.get(id).is_some_and(Gate::is_open)
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
    pub fn iter(&self) -> impl Iterator<Item = &Gate> {
        self.0.values()
    }

    #[inline]
    pub fn iter_open(&self) -> impl Iterator<Item = &Gate> {
        self.0.values().filter(|g| g.is_open())
    }

    #[inline]
    pub fn ids(&self) -> impl Iterator<Item = &GateIdentifier> {
        self.0.keys()
    }
}

impl FromIterator<Gate> for GateContainer {
    fn from_iter<I: IntoIterator<Item = Gate>>(iter: I) -> Self {
        let mut c = Self::new();
        for g in iter {
            c.insert(g);
        }
        c
    }
}

impl Serialize for GateContainer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gid(s: &str) -> GateIdentifier {
        GateIdentifier::from(s)
    }

    fn gate(s: &str, open: bool) -> Gate {
        Gate::new(gid(s), Location::Planar([0.0, 0.0]), open)
    }

    #[test]
    fn test_location_from_slice_accepts_two_or_three_dims() {
        assert_eq!(
            Location::from_slice(&[1.0, 2.0]),
            Some(Location::Planar([1.0, 2.0]))
        );
        assert_eq!(
            Location::from_slice(&[1.0, 2.0, 3.0]),
            Some(Location::Spatial([1.0, 2.0, 3.0]))
        );
        assert_eq!(Location::from_slice(&[1.0]), None);
        assert_eq!(Location::from_slice(&[1.0, 2.0, 3.0, 4.0]), None);
        assert_eq!(Location::from_slice(&[1.0, f64::NAN]), None);
    }

    #[test]
    fn test_euclidean_mixes_planar_and_spatial() {
        let a = Location::Planar([0.0, 0.0]);
        let b = Location::Spatial([3.0, 4.0, 0.0]);
        assert_eq!(a.euclidean(&b), 5.0);
        let c = Location::Spatial([0.0, 0.0, 2.0]);
        assert_eq!(a.euclidean(&c), 2.0);
    }

    #[test]
    fn test_close_gate() {
        let mut g = gate("G1", true);
        assert!(g.is_open());
        g.close();
        assert!(g.is_closed());
    }

    #[test]
    fn test_container_iterates_in_id_order() {
        let c: GateContainer = vec![gate("G3", true), gate("G1", false), gate("G2", true)]
            .into_iter()
            .collect();
        let ids: Vec<&str> = c.ids().map(|i| i.as_str()).collect();
        assert_eq!(ids, vec!["G1", "G2", "G3"]);
        let open: Vec<&str> = c.iter_open().map(|g| g.id().as_str()).collect();
        assert_eq!(open, vec!["G2", "G3"]);
        assert!(c.is_open(&gid("G2")));
        assert!(!c.is_open(&gid("G1")));
        assert!(!c.is_open(&gid("G9")));
    }

    #[test]
    fn test_serialize_as_list() {
        let c: GateContainer = vec![gate("G1", true)].into_iter().collect();
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"id": "G1", "location": [0.0, 0.0], "open": true}])
        );
    }
}
