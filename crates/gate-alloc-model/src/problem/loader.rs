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
    err::{LoaderError, TimeFormatError},
    flight::FlightStatus,
    normalize::{NormalizedData, Normalizer},
    records::{DistanceRecord, FlightRecord, GateRecord, SnapshotDocument},
};
use chrono::{DateTime, NaiveTime, Timelike};
use serde::Deserialize;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

const DEFAULT_OCCUPANCY_BEFORE_MINUTES: i64 = 30;
const DEFAULT_OCCUPANCY_AFTER_MINUTES: i64 = 30;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTime {
    Minutes(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct RawFlight {
    id: String,
    #[serde(alias = "originalGateId")]
    original_gate_id: String,
    #[serde(default)]
    arrival: Option<RawTime>,
    departure: RawTime,
    #[serde(default)]
    status: FlightStatus,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    gates: Vec<GateRecord>,
    flights: Vec<RawFlight>,
    #[serde(default)]
    distances: Vec<DistanceRecord>,
}

/// Reads a JSON operational snapshot and normalizes it.
///
/// Times may be integer minutes, `"HH:MM"` (minutes since midnight) or
/// RFC 3339 timestamps (minutes since the Unix epoch). A flight without an
/// arrival occupies its gate from `before` minutes ahead of departure until
/// `after` minutes past it.
#[derive(Debug, Clone)]
pub struct SnapshotLoader {
    occupancy_before: i64,
    occupancy_after: i64,
}

impl Default for SnapshotLoader {
    fn default() -> Self {
        Self {
            occupancy_before: DEFAULT_OCCUPANCY_BEFORE_MINUTES,
            occupancy_after: DEFAULT_OCCUPANCY_AFTER_MINUTES,
        }
    }
}

impl SnapshotLoader {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_occupancy(mut self, before_minutes: i64, after_minutes: i64) -> Self {
        self.occupancy_before = before_minutes.max(0);
        self.occupancy_after = after_minutes.max(0);
        self
    }

    pub fn from_path(&self, path: impl AsRef<Path>) -> Result<NormalizedData, LoaderError> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "loading snapshot");
        let file = File::open(path)?;
        self.from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(&self, r: R) -> Result<NormalizedData, LoaderError> {
        let raw: RawSnapshot = serde_json::from_reader(r)?;
        self.normalize(raw)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(&self, s: &str) -> Result<NormalizedData, LoaderError> {
        let raw: RawSnapshot = serde_json::from_str(s)?;
        self.normalize(raw)
    }

    /// Resolves all times to minutes and returns the snapshot in feed form,
    /// without validating it.
    pub fn document_from_str(&self, s: &str) -> Result<SnapshotDocument, LoaderError> {
        let raw: RawSnapshot = serde_json::from_str(s)?;
        self.resolve(raw)
    }

    fn normalize(&self, raw: RawSnapshot) -> Result<NormalizedData, LoaderError> {
        let doc = self.resolve(raw)?;
        Ok(Normalizer::normalize_document(doc)?)
    }

    fn resolve(&self, raw: RawSnapshot) -> Result<SnapshotDocument, LoaderError> {
        let flights = raw
            .flights
            .into_iter()
            .map(|f| self.resolve_flight(f))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SnapshotDocument {
            gates: raw.gates,
            flights,
            distances: raw.distances,
        })
    }

    fn resolve_flight(&self, raw: RawFlight) -> Result<FlightRecord, TimeFormatError> {
        let departure = parse_time(&raw.id, &raw.departure)?;
        let (arrival, departure) = match &raw.arrival {
            Some(a) => (parse_time(&raw.id, a)?, departure),
            None => (
                departure.saturating_sub(self.occupancy_before),
                departure.saturating_add(self.occupancy_after),
            ),
        };
        Ok(FlightRecord {
            id: raw.id,
            original_gate_id: raw.original_gate_id,
            arrival,
            departure,
            status: raw.status,
        })
    }
}

fn parse_time(flight: &str, t: &RawTime) -> Result<i64, TimeFormatError> {
    let text = match t {
        RawTime::Minutes(m) => return Ok(*m),
        RawTime::Text(s) => s.trim(),
    };
    if let Ok(m) = text.parse::<i64>() {
        return Ok(m);
    }
    if let Ok(hm) = NaiveTime::parse_from_str(text, "%H:%M") {
        return Ok(i64::from(hm.hour()) * 60 + i64::from(hm.minute()));
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(ts.timestamp().div_euclid(60));
    }
    Err(TimeFormatError::new(flight, text))
}
