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
use gate_alloc_core::prelude::{TimeDelta, TimePoint};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateGateError {
    gate: GateIdentifier,
}

impl DuplicateGateError {
    pub fn new(gate: GateIdentifier) -> Self {
        Self { gate }
    }

    pub fn gate(&self) -> &GateIdentifier {
        &self.gate
    }
}

impl std::fmt::Display for DuplicateGateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Gate {} is defined more than once", self.gate)
    }
}

impl std::error::Error for DuplicateGateError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateFlightError {
    flight: FlightIdentifier,
}

impl DuplicateFlightError {
    pub fn new(flight: FlightIdentifier) -> Self {
        Self { flight }
    }

    pub fn flight(&self) -> &FlightIdentifier {
        &self.flight
    }
}

impl std::fmt::Display for DuplicateFlightError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Flight {} is defined more than once", self.flight)
    }
}

impl std::error::Error for DuplicateFlightError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownOriginalGateError {
    flight: FlightIdentifier,
    gate: GateIdentifier,
}

impl UnknownOriginalGateError {
    pub fn new(flight: FlightIdentifier, gate: GateIdentifier) -> Self {
        Self { flight, gate }
    }

    pub fn flight(&self) -> &FlightIdentifier {
        &self.flight
    }

    pub fn gate(&self) -> &GateIdentifier {
        &self.gate
    }
}

impl std::fmt::Display for UnknownOriginalGateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Flight {} references unknown original gate {}",
            self.flight, self.gate
        )
    }
}

impl std::error::Error for UnknownOriginalGateError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvalidWindowError {
    flight: FlightIdentifier,
    arrival: TimePoint<i64>,
    departure: TimePoint<i64>,
}

impl InvalidWindowError {
    pub fn new(flight: FlightIdentifier, arrival: TimePoint<i64>, departure: TimePoint<i64>) -> Self {
        Self {
            flight,
            arrival,
            departure,
        }
    }

    pub fn flight(&self) -> &FlightIdentifier {
        &self.flight
    }

    pub fn arrival(&self) -> TimePoint<i64> {
        self.arrival
    }

    pub fn departure(&self) -> TimePoint<i64> {
        self.departure
    }
}

impl std::fmt::Display for InvalidWindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Flight {} departs at {} before it arrives at {}",
            self.flight, self.departure, self.arrival
        )
    }
}

impl std::error::Error for InvalidWindowError {}

#[derive(Debug, Clone, PartialEq)]
pub struct InvalidCoordinatesError {
    gate: GateIdentifier,
    coordinates: Vec<f64>,
}

impl InvalidCoordinatesError {
    pub fn new(gate: GateIdentifier, coordinates: Vec<f64>) -> Self {
        Self { gate, coordinates }
    }

    pub fn gate(&self) -> &GateIdentifier {
        &self.gate
    }

    pub fn coordinates(&self) -> &[f64] {
        &self.coordinates
    }
}

impl std::fmt::Display for InvalidCoordinatesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Gate {} has invalid coordinates {:?}; expected two or three finite values",
            self.gate, self.coordinates
        )
    }
}

impl std::error::Error for InvalidCoordinatesError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownDistanceGateError {
    gate: GateIdentifier,
}

impl UnknownDistanceGateError {
    pub fn new(gate: GateIdentifier) -> Self {
        Self { gate }
    }

    pub fn gate(&self) -> &GateIdentifier {
        &self.gate
    }
}

impl std::fmt::Display for UnknownDistanceGateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Distance record references unknown gate {}", self.gate)
    }
}

impl std::error::Error for UnknownDistanceGateError {}

#[derive(Debug, Clone, PartialEq)]
pub struct InvalidDistanceError {
    first: GateIdentifier,
    second: GateIdentifier,
    raw: f64,
}

impl InvalidDistanceError {
    pub fn new(first: GateIdentifier, second: GateIdentifier, raw: f64) -> Self {
        Self { first, second, raw }
    }

    pub fn first(&self) -> &GateIdentifier {
        &self.first
    }

    pub fn second(&self) -> &GateIdentifier {
        &self.second
    }

    pub fn raw(&self) -> f64 {
        self.raw
    }
}

impl std::fmt::Display for InvalidDistanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Distance between {} and {} is invalid: {}",
            self.first, self.second, self.raw
        )
    }
}

impl std::error::Error for InvalidDistanceError {}

#[derive(Debug, Clone, PartialEq)]
pub struct ConflictingDistanceError {
    first: GateIdentifier,
    second: GateIdentifier,
    previous: f64,
    current: f64,
}

impl ConflictingDistanceError {
    pub fn new(first: GateIdentifier, second: GateIdentifier, previous: f64, current: f64) -> Self {
        Self {
            first,
            second,
            previous,
            current,
        }
    }

    pub fn first(&self) -> &GateIdentifier {
        &self.first
    }

    pub fn second(&self) -> &GateIdentifier {
        &self.second
    }
}

impl std::fmt::Display for ConflictingDistanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Distance between {} and {} given twice with different values ({} and {})",
            self.first, self.second, self.previous, self.current
        )
    }
}

impl std::error::Error for ConflictingDistanceError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MissingDistanceError {
    first: GateIdentifier,
    second: GateIdentifier,
}

impl MissingDistanceError {
    pub fn new(first: GateIdentifier, second: GateIdentifier) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> &GateIdentifier {
        &self.first
    }

    pub fn second(&self) -> &GateIdentifier {
        &self.second
    }
}

impl std::fmt::Display for MissingDistanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "No distance given between {} and {}",
            self.first, self.second
        )
    }
}

impl std::error::Error for MissingDistanceError {}

/// Malformed or inconsistent input at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    DuplicateGate(DuplicateGateError),
    DuplicateFlight(DuplicateFlightError),
    UnknownOriginalGate(UnknownOriginalGateError),
    InvalidWindow(InvalidWindowError),
    InvalidCoordinates(InvalidCoordinatesError),
    UnknownDistanceGate(UnknownDistanceGateError),
    InvalidDistance(InvalidDistanceError),
    ConflictingDistance(ConflictingDistanceError),
    MissingDistance(MissingDistanceError),
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::DuplicateGate(e) => write!(f, "{}", e),
            DataError::DuplicateFlight(e) => write!(f, "{}", e),
            DataError::UnknownOriginalGate(e) => write!(f, "{}", e),
            DataError::InvalidWindow(e) => write!(f, "{}", e),
            DataError::InvalidCoordinates(e) => write!(f, "{}", e),
            DataError::UnknownDistanceGate(e) => write!(f, "{}", e),
            DataError::InvalidDistance(e) => write!(f, "{}", e),
            DataError::ConflictingDistance(e) => write!(f, "{}", e),
            DataError::MissingDistance(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DataError {}

impl From<DuplicateGateError> for DataError {
    fn from(err: DuplicateGateError) -> Self {
        DataError::DuplicateGate(err)
    }
}

impl From<DuplicateFlightError> for DataError {
    fn from(err: DuplicateFlightError) -> Self {
        DataError::DuplicateFlight(err)
    }
}

impl From<UnknownOriginalGateError> for DataError {
    fn from(err: UnknownOriginalGateError) -> Self {
        DataError::UnknownOriginalGate(err)
    }
}

impl From<InvalidWindowError> for DataError {
    fn from(err: InvalidWindowError) -> Self {
        DataError::InvalidWindow(err)
    }
}

impl From<InvalidCoordinatesError> for DataError {
    fn from(err: InvalidCoordinatesError) -> Self {
        DataError::InvalidCoordinates(err)
    }
}

impl From<UnknownDistanceGateError> for DataError {
    fn from(err: UnknownDistanceGateError) -> Self {
        DataError::UnknownDistanceGate(err)
    }
}

impl From<InvalidDistanceError> for DataError {
    fn from(err: InvalidDistanceError) -> Self {
        DataError::InvalidDistance(err)
    }
}

impl From<ConflictingDistanceError> for DataError {
    fn from(err: ConflictingDistanceError) -> Self {
        DataError::ConflictingDistance(err)
    }
}

impl From<MissingDistanceError> for DataError {
    fn from(err: MissingDistanceError) -> Self {
        DataError::MissingDistance(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DelayOutOfRangeError {
    flight: FlightIdentifier,
    offset: TimeDelta<i64>,
}

impl DelayOutOfRangeError {
    pub fn new(flight: FlightIdentifier, offset: TimeDelta<i64>) -> Self {
        Self { flight, offset }
    }

    pub fn flight(&self) -> &FlightIdentifier {
        &self.flight
    }

    pub fn offset(&self) -> TimeDelta<i64> {
        self.offset
    }
}

impl std::fmt::Display for DelayOutOfRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Delaying flight {} by {} leaves the representable time range",
            self.flight, self.offset
        )
    }
}

impl std::error::Error for DelayOutOfRangeError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeFormatError {
    flight: String,
    value: String,
}

impl TimeFormatError {
    pub fn new(flight: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            flight: flight.into(),
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for TimeFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Flight {}: cannot parse time {:?}; expected minutes, HH:MM or RFC 3339",
            self.flight, self.value
        )
    }
}

impl std::error::Error for TimeFormatError {}

#[derive(Debug)]
pub enum LoaderError {
    Io(std::io::Error),
    Json(serde_json::Error),
    TimeFormat(TimeFormatError),
    Data(DataError),
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::Io(e) => write!(f, "I/O error: {}", e),
            LoaderError::Json(e) => write!(f, "Malformed snapshot: {}", e),
            LoaderError::TimeFormat(e) => write!(f, "{}", e),
            LoaderError::Data(e) => write!(f, "Invalid snapshot: {}", e),
        }
    }
}

impl std::error::Error for LoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoaderError::Io(e) => Some(e),
            LoaderError::Json(e) => Some(e),
            LoaderError::TimeFormat(e) => Some(e),
            LoaderError::Data(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        LoaderError::Io(err)
    }
}

impl From<serde_json::Error> for LoaderError {
    fn from(err: serde_json::Error) -> Self {
        LoaderError::Json(err)
    }
}

impl From<TimeFormatError> for LoaderError {
    fn from(err: TimeFormatError) -> Self {
        LoaderError::TimeFormat(err)
    }
}

impl From<DataError> for LoaderError {
    fn from(err: DataError) -> Self {
        LoaderError::Data(err)
    }
}
