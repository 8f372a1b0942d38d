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
    flight::FlightStatus,
    gate::Location,
    records::{DistanceRecord, FlightRecord, GateRecord, SnapshotDocument},
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal, NormalError};

#[derive(Debug, Clone, PartialEq)]
pub struct InvalidDwellDistributionError {
    mean: f64,
    std_dev: f64,
    source: NormalError,
}

impl std::fmt::Display for InvalidDwellDistributionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid dwell distribution (mean {}, std dev {}): {}",
            self.mean, self.std_dev, self.source
        )
    }
}

impl std::error::Error for InvalidDwellDistributionError {}

/// Seeded synthetic snapshot generator.
///
/// Gates sit on a rectangular grid with Euclidean distances. Arrivals are
/// uniform over the operating day and dwell times are normally distributed.
/// Every flight starts on a random gate, so the raw snapshot usually
/// contains conflicts. The same seed always yields the same document.
#[derive(Debug, Clone)]
pub struct InstanceGenerator {
    flights: usize,
    gates: usize,
    seed: u64,
    columns: usize,
    spacing: f64,
    day_start: i64,
    day_end: i64,
    dwell_mean: f64,
    dwell_std_dev: f64,
    min_dwell: i64,
    closed_ratio: f64,
    cancelled_ratio: f64,
}

impl Default for InstanceGenerator {
    fn default() -> Self {
        Self {
            flights: 40,
            gates: 8,
            seed: 0,
            columns: 4,
            spacing: 50.0,
            day_start: 6 * 60,
            day_end: 22 * 60,
            dwell_mean: 50.0,
            dwell_std_dev: 15.0,
            min_dwell: 20,
            closed_ratio: 0.0,
            cancelled_ratio: 0.0,
        }
    }
}

impl InstanceGenerator {
    #[inline]
    pub fn new(flights: usize, gates: usize, seed: u64) -> Self {
        Self {
            flights,
            gates,
            seed,
            ..Self::default()
        }
    }

    #[inline]
    pub fn with_grid(mut self, columns: usize, spacing: f64) -> Self {
        self.columns = columns.max(1);
        self.spacing = spacing;
        self
    }

    /// Operating day in minutes since midnight.
    #[inline]
    pub fn with_day(mut self, start: i64, end: i64) -> Self {
        self.day_start = start.min(end);
        self.day_end = start.max(end);
        self
    }

    #[inline]
    pub fn with_dwell(mut self, mean: f64, std_dev: f64, min: i64) -> Self {
        self.dwell_mean = mean;
        self.dwell_std_dev = std_dev;
        self.min_dwell = min.max(0);
        self
    }

    #[inline]
    pub fn with_closed_ratio(mut self, ratio: f64) -> Self {
        self.closed_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    #[inline]
    pub fn with_cancelled_ratio(mut self, ratio: f64) -> Self {
        self.cancelled_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    pub fn generate(&self) -> Result<SnapshotDocument, InvalidDwellDistributionError> {
        let invalid = |source| InvalidDwellDistributionError {
            mean: self.dwell_mean,
            std_dev: self.dwell_std_dev,
            source,
        };
        // Normal::new accepts a negative deviation.
        if !(self.dwell_std_dev.is_finite() && self.dwell_std_dev >= 0.0) {
            return Err(invalid(NormalError::BadVariance));
        }
        let dwell = Normal::new(self.dwell_mean, self.dwell_std_dev).map_err(invalid)?;
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);

        let gate_width = self.gates.max(1).to_string().len();
        let locations: Vec<(String, Location)> = (0..self.gates)
            .map(|i| {
                let x = (i % self.columns) as f64 * self.spacing;
                let y = (i / self.columns) as f64 * self.spacing;
                (
                    format!("G{:0width$}", i + 1, width = gate_width),
                    Location::Planar([x, y]),
                )
            })
            .collect();

        let gates: Vec<GateRecord> = locations
            .iter()
            .map(|(id, loc)| GateRecord {
                id: id.clone(),
                coordinates: loc.coordinates().to_vec(),
                is_open: !rng.random_bool(self.closed_ratio),
            })
            .collect();

        let mut distances = Vec::with_capacity(self.gates * self.gates.saturating_sub(1) / 2);
        for (i, (a, la)) in locations.iter().enumerate() {
            for (b, lb) in &locations[i + 1..] {
                distances.push(DistanceRecord {
                    gate_a: a.clone(),
                    gate_b: b.clone(),
                    cost: (la.euclidean(lb) * 100.0).round() / 100.0,
                });
            }
        }

        let flight_width = self.flights.max(1).to_string().len();
        let mut flights = Vec::with_capacity(self.flights);
        if !locations.is_empty() {
            for i in 0..self.flights {
                let arrival = if self.day_end > self.day_start {
                    rng.random_range(self.day_start..self.day_end)
                } else {
                    self.day_start
                };
                let stay = (dwell.sample(&mut rng).round() as i64).max(self.min_dwell);
                let gate = &locations[rng.random_range(0..locations.len())].0;
                let status = if rng.random_bool(self.cancelled_ratio) {
                    FlightStatus::Cancelled
                } else {
                    FlightStatus::Scheduled
                };
                flights.push(FlightRecord {
                    id: format!("F{:0width$}", i + 1, width = flight_width),
                    original_gate_id: gate.clone(),
                    arrival,
                    departure: arrival.saturating_add(stay),
                    status,
                });
            }
        }

        tracing::debug!(
            seed = self.seed,
            flights = flights.len(),
            gates = gates.len(),
            "generated synthetic snapshot"
        );

        Ok(SnapshotDocument {
            gates,
            flights,
            distances,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::normalize::Normalizer;

    #[test]
    fn test_same_seed_same_document() {
        let a = InstanceGenerator::new(30, 6, 7).generate().unwrap();
        let b = InstanceGenerator::new(30, 6, 7).generate().unwrap();
        assert_eq!(a, b);
        let c = InstanceGenerator::new(30, 6, 8).generate().unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_generated_document_normalizes() {
        let doc = InstanceGenerator::new(50, 9, 42)
            .with_closed_ratio(0.2)
            .with_cancelled_ratio(0.1)
            .generate()
            .unwrap();
        assert_eq!(doc.gates.len(), 9);
        assert_eq!(doc.flights.len(), 50);
        assert_eq!(doc.distances.len(), 9 * 8 / 2);
        let data = Normalizer::normalize_document(doc).unwrap();
        assert_eq!(data.flights().len(), 50);
    }

    #[test]
    fn test_dwell_respects_minimum() {
        let doc = InstanceGenerator::new(100, 3, 1)
            .with_dwell(5.0, 30.0, 25)
            .generate()
            .unwrap();
        assert!(doc.flights.iter().all(|f| f.departure - f.arrival >= 25));
    }

    #[test]
    fn test_invalid_distribution() {
        for std_dev in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(
                InstanceGenerator::default()
                    .with_dwell(10.0, std_dev, 0)
                    .generate()
                    .is_err()
            );
        }
        assert!(
            InstanceGenerator::default()
                .with_dwell(10.0, 0.0, 0)
                .generate()
                .is_ok()
        );
    }

    #[test]
    fn test_no_gates_yields_no_flights() {
        let doc = InstanceGenerator::new(10, 0, 3).generate().unwrap();
        assert!(doc.gates.is_empty());
        assert!(doc.flights.is_empty());
    }
}
