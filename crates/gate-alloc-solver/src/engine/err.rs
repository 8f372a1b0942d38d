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

use crate::{solver::err::SolveError, store::err::ConcurrencyConflict};
use gate_alloc_model::prelude::{
    AssignmentValidationError, DelayOutOfRangeError, FlightIdentifier, GateIdentifier,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownFlightError {
    flight: FlightIdentifier,
}

impl UnknownFlightError {
    pub fn new(flight: FlightIdentifier) -> Self {
        Self { flight }
    }

    pub fn flight(&self) -> &FlightIdentifier {
        &self.flight
    }
}

impl std::fmt::Display for UnknownFlightError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown flight {}", self.flight)
    }
}

impl std::error::Error for UnknownFlightError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownGateError {
    gate: GateIdentifier,
}

impl UnknownGateError {
    pub fn new(gate: GateIdentifier) -> Self {
        Self { gate }
    }

    pub fn gate(&self) -> &GateIdentifier {
        &self.gate
    }
}

impl std::fmt::Display for UnknownGateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown gate {}", self.gate)
    }
}

impl std::error::Error for UnknownGateError {}

/// An event names an entity that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferentialError {
    UnknownFlight(UnknownFlightError),
    UnknownGate(UnknownGateError),
}

impl std::fmt::Display for ReferentialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferentialError::UnknownFlight(e) => write!(f, "{}", e),
            ReferentialError::UnknownGate(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ReferentialError {}

impl From<UnknownFlightError> for ReferentialError {
    fn from(err: UnknownFlightError) -> Self {
        ReferentialError::UnknownFlight(err)
    }
}

impl From<UnknownGateError> for ReferentialError {
    fn from(err: UnknownGateError) -> Self {
        ReferentialError::UnknownGate(err)
    }
}

/// Why a single event of a batch was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventError {
    Referential(ReferentialError),
    DelayOutOfRange(DelayOutOfRangeError),
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventError::Referential(e) => write!(f, "{}", e),
            EventError::DelayOutOfRange(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for EventError {}

impl From<ReferentialError> for EventError {
    fn from(err: ReferentialError) -> Self {
        EventError::Referential(err)
    }
}

impl From<UnknownFlightError> for EventError {
    fn from(err: UnknownFlightError) -> Self {
        EventError::Referential(err.into())
    }
}

impl From<UnknownGateError> for EventError {
    fn from(err: UnknownGateError) -> Self {
        EventError::Referential(err.into())
    }
}

impl From<DelayOutOfRangeError> for EventError {
    fn from(err: DelayOutOfRangeError) -> Self {
        EventError::DelayOutOfRange(err)
    }
}

/// Internal failure of a reassignment. The committed state is untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReassignError {
    Solve(SolveError),
    InvalidOutcome(AssignmentValidationError),
    RetriesExhausted(ConcurrencyConflict),
}

impl std::fmt::Display for ReassignError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReassignError::Solve(e) => write!(f, "Solve failed: {}", e),
            ReassignError::InvalidOutcome(e) => {
                write!(f, "Solver produced an invalid assignment: {}", e)
            }
            ReassignError::RetriesExhausted(e) => {
                write!(f, "Commit retries exhausted: {}", e)
            }
        }
    }
}

impl std::error::Error for ReassignError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReassignError::Solve(e) => Some(e),
            ReassignError::InvalidOutcome(e) => Some(e),
            ReassignError::RetriesExhausted(e) => Some(e),
        }
    }
}

impl From<SolveError> for ReassignError {
    fn from(err: SolveError) -> Self {
        ReassignError::Solve(err)
    }
}

impl From<AssignmentValidationError> for ReassignError {
    fn from(err: AssignmentValidationError) -> Self {
        ReassignError::InvalidOutcome(err)
    }
}

impl From<ConcurrencyConflict> for ReassignError {
    fn from(err: ConcurrencyConflict) -> Self {
        ReassignError::RetriesExhausted(err)
    }
}
