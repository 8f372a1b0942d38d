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

use crate::problem::{
    distance::DistanceMatrix,
    err::{
        ConflictingDistanceError, DataError, DuplicateFlightError, DuplicateGateError,
        InvalidCoordinatesError, InvalidDistanceError, InvalidWindowError, MissingDistanceError,
        UnknownDistanceGateError, UnknownOriginalGateError,
    },
    flight::{Flight, FlightContainer, FlightIdentifier},
    gate::{Gate, GateContainer, GateIdentifier, Location},
    records::{DistanceRecord, FlightRecord, GateRecord, SnapshotDocument},
};
use gate_alloc_core::prelude::{TimeInterval, TimePoint, scale_cost};
use std::collections::BTreeMap;

/// Validated entities ready for the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedData {
    flights: FlightContainer,
    gates: GateContainer,
    distances: DistanceMatrix,
}

impl NormalizedData {
    #[inline]
    pub fn new(flights: FlightContainer, gates: GateContainer, distances: DistanceMatrix) -> Self {
        Self {
            flights,
            gates,
            distances,
        }
    }

    #[inline]
    pub fn flights(&self) -> &FlightContainer {
        &self.flights
    }

    #[inline]
    pub fn gates(&self) -> &GateContainer {
        &self.gates
    }

    #[inline]
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    #[inline]
    pub fn into_parts(self) -> (FlightContainer, GateContainer, DistanceMatrix) {
        (self.flights, self.gates, self.distances)
    }
}

/// Turns feed records into entities, failing on the first inconsistency.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn normalize<F, G, D>(
        raw_flights: F,
        raw_gates: G,
        raw_distances: D,
    ) -> Result<NormalizedData, DataError>
    where
        F: IntoIterator<Item = FlightRecord>,
        G: IntoIterator<Item = GateRecord>,
        D: IntoIterator<Item = DistanceRecord>,
    {
        let gates = Self::normalize_gates(raw_gates)?;
        let distances = Self::normalize_distances(&gates, raw_distances)?;
        let flights = Self::normalize_flights(&gates, raw_flights)?;

        tracing::debug!(
            flights = flights.len(),
            gates = gates.len(),
            distance_pairs = distances.len(),
            "normalized snapshot"
        );

        Ok(NormalizedData::new(flights, gates, distances))
    }

    #[inline]
    pub fn normalize_document(doc: SnapshotDocument) -> Result<NormalizedData, DataError> {
        Self::normalize(doc.flights, doc.gates, doc.distances)
    }

    fn normalize_gates<G>(raw: G) -> Result<GateContainer, DataError>
    where
        G: IntoIterator<Item = GateRecord>,
    {
        let mut gates = GateContainer::new();
        for rec in raw {
            let id = GateIdentifier::new(rec.id);
            if gates.contains_id(&id) {
                return Err(DuplicateGateError::new(id).into());
            }
            let location = Location::from_slice(&rec.coordinates)
                .ok_or_else(|| InvalidCoordinatesError::new(id.clone(), rec.coordinates.clone()))?;
            gates.insert(Gate::new(id, location, rec.is_open));
        }
        Ok(gates)
    }

    fn normalize_distances<D>(gates: &GateContainer, raw: D) -> Result<DistanceMatrix, DataError>
    where
        D: IntoIterator<Item = DistanceRecord>,
    {
        let mut matrix = DistanceMatrix::new();
        let mut seen: BTreeMap<(GateIdentifier, GateIdentifier), f64> = BTreeMap::new();

        for rec in raw {
            let a = GateIdentifier::new(rec.gate_a);
            let b = GateIdentifier::new(rec.gate_b);
            for g in [&a, &b] {
                if !gates.contains_id(g) {
                    return Err(UnknownDistanceGateError::new(g.clone()).into());
                }
            }

            let cost = scale_cost(rec.cost)
                .ok_or_else(|| InvalidDistanceError::new(a.clone(), b.clone(), rec.cost))?;
            if a == b {
                if cost != 0 {
                    return Err(InvalidDistanceError::new(a, b, rec.cost).into());
                }
                continue;
            }

            let key = if a <= b {
                (a.clone(), b.clone())
            } else {
                (b.clone(), a.clone())
            };
            if let Some(previous) = matrix.insert(&a, &b, cost) {
                if previous != cost {
                    let previous_raw = seen.get(&key).copied().unwrap_or(f64::NAN);
                    return Err(ConflictingDistanceError::new(a, b, previous_raw, rec.cost).into());
                }
            }
            seen.insert(key, rec.cost);
        }

        let ids: Vec<&GateIdentifier> = gates.ids().collect();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                if !matrix.contains_pair(a, b) {
                    return Err(MissingDistanceError::new((*a).clone(), (*b).clone()).into());
                }
            }
        }

        Ok(matrix)
    }

    fn normalize_flights<F>(gates: &GateContainer, raw: F) -> Result<FlightContainer, DataError>
    where
        F: IntoIterator<Item = FlightRecord>,
    {
        let mut flights = FlightContainer::new();
        for rec in raw {
            let id = FlightIdentifier::new(rec.id);
            if flights.contains_id(&id) {
                return Err(DuplicateFlightError::new(id).into());
            }

            let original_gate = GateIdentifier::new(rec.original_gate_id);
            if !gates.contains_id(&original_gate) {
                return Err(UnknownOriginalGateError::new(id, original_gate).into());
            }

            let arrival = TimePoint::new(rec.arrival);
            let departure = TimePoint::new(rec.departure);
            let schedule = TimeInterval::try_new(arrival, departure)
                .ok_or_else(|| InvalidWindowError::new(id.clone(), arrival, departure))?;

            flights.insert(Flight::new(id, schedule, original_gate, rec.status));
        }
        Ok(flights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::flight::FlightStatus;

    fn gate_rec(id: &str) -> GateRecord {
        GateRecord {
            id: id.to_string(),
            coordinates: vec![0.0, 0.0],
            is_open: true,
        }
    }

    fn flight_rec(id: &str, gate: &str, a: i64, d: i64) -> FlightRecord {
        FlightRecord {
            id: id.to_string(),
            original_gate_id: gate.to_string(),
            arrival: a,
            departure: d,
            status: FlightStatus::Scheduled,
        }
    }

    fn dist(a: &str, b: &str, c: f64) -> DistanceRecord {
        DistanceRecord {
            gate_a: a.to_string(),
            gate_b: b.to_string(),
            cost: c,
        }
    }

    fn gid(s: &str) -> GateIdentifier {
        GateIdentifier::from(s)
    }

    #[test]
    fn test_normalize_happy_path() {
        let data = Normalizer::normalize(
            vec![flight_rec("F1", "G1", 600, 630)],
            vec![gate_rec("G1"), gate_rec("G2"), gate_rec("G3")],
            vec![dist("G1", "G2", 1.5), dist("G3", "G1", 2.0), dist("G2", "G3", 0.25)],
        )
        .unwrap();
        assert_eq!(data.flights().len(), 1);
        assert_eq!(data.gates().len(), 3);
        assert_eq!(data.distances().cost(&gid("G2"), &gid("G1")), Some(150));
        assert_eq!(data.distances().cost(&gid("G1"), &gid("G3")), Some(200));
        assert_eq!(data.distances().cost(&gid("G3"), &gid("G2")), Some(25));
    }

    #[test]
    fn test_unknown_original_gate() {
        let err = Normalizer::normalize(
            vec![flight_rec("F1", "G9", 0, 1)],
            vec![gate_rec("G1")],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, DataError::UnknownOriginalGate(_)));
    }

    #[test]
    fn test_departure_before_arrival() {
        let err = Normalizer::normalize(
            vec![flight_rec("F1", "G1", 100, 50)],
            vec![gate_rec("G1")],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, DataError::InvalidWindow(_)));
    }

    #[test]
    fn test_zero_length_window_is_accepted() {
        let data = Normalizer::normalize(
            vec![flight_rec("F1", "G1", 100, 100)],
            vec![gate_rec("G1")],
            vec![],
        )
        .unwrap();
        assert_eq!(data.flights().len(), 1);
    }

    #[test]
    fn test_duplicate_ids() {
        let err = Normalizer::normalize(
            Vec::new(),
            vec![gate_rec("G1"), gate_rec("G1")],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, DataError::DuplicateGate(_)));

        let err = Normalizer::normalize(
            vec![flight_rec("F1", "G1", 0, 1), flight_rec("F1", "G1", 2, 3)],
            vec![gate_rec("G1")],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, DataError::DuplicateFlight(_)));
    }

    #[test]
    fn test_missing_distance_pair() {
        let err = Normalizer::normalize(
            Vec::new(),
            vec![gate_rec("G1"), gate_rec("G2"), gate_rec("G3")],
            vec![dist("G1", "G2", 1.0), dist("G2", "G3", 1.0)],
        )
        .unwrap_err();
        match err {
            DataError::MissingDistance(e) => {
                assert_eq!(e.first(), &gid("G1"));
                assert_eq!(e.second(), &gid("G3"));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_distance_validation() {
        let gates = || vec![gate_rec("G1"), gate_rec("G2")];

        let err = Normalizer::normalize(Vec::new(), gates(), vec![dist("G1", "G2", -1.0)])
            .unwrap_err();
        assert!(matches!(err, DataError::InvalidDistance(_)));

        let err = Normalizer::normalize(Vec::new(), gates(), vec![dist("G1", "GX", 1.0)])
            .unwrap_err();
        assert!(matches!(err, DataError::UnknownDistanceGate(_)));

        let err = Normalizer::normalize(
            Vec::new(),
            gates(),
            vec![dist("G1", "G2", 1.0), dist("G2", "G1", 3.0)],
        )
        .unwrap_err();
        assert!(matches!(err, DataError::ConflictingDistance(_)));

        let err = Normalizer::normalize(
            Vec::new(),
            gates(),
            vec![dist("G1", "G2", 1.0), dist("G1", "G1", 0.5)],
        )
        .unwrap_err();
        assert!(matches!(err, DataError::InvalidDistance(_)));
    }

    #[test]
    fn test_repeated_consistent_distance_and_zero_diagonal_are_accepted() {
        let data = Normalizer::normalize(
            Vec::new(),
            vec![gate_rec("G1"), gate_rec("G2")],
            vec![dist("G1", "G2", 4.0), dist("G2", "G1", 4.0), dist("G1", "G1", 0.0)],
        )
        .unwrap();
        assert_eq!(data.distances().len(), 1);
    }

    #[test]
    fn test_invalid_coordinates() {
        let mut g = gate_rec("G1");
        g.coordinates = vec![1.0];
        let err = Normalizer::normalize(Vec::new(), vec![g], vec![]).unwrap_err();
        assert!(matches!(err, DataError::InvalidCoordinates(_)));
    }
}
