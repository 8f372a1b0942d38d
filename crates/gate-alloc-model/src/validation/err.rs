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

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownAssignedFlightError {
    flight: FlightIdentifier,
}

impl UnknownAssignedFlightError {
    pub fn new(flight: FlightIdentifier) -> Self {
        Self { flight }
    }

    pub fn flight(&self) -> &FlightIdentifier {
        &self.flight
    }
}

impl std::fmt::Display for UnknownAssignedFlightError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Assignment references unknown flight {}", self.flight)
    }
}

impl std::error::Error for UnknownAssignedFlightError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CancelledFlightAssignedError {
    flight: FlightIdentifier,
}

impl CancelledFlightAssignedError {
    pub fn new(flight: FlightIdentifier) -> Self {
        Self { flight }
    }

    pub fn flight(&self) -> &FlightIdentifier {
        &self.flight
    }
}

impl std::fmt::Display for CancelledFlightAssignedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cancelled flight {} holds a gate", self.flight)
    }
}

impl std::error::Error for CancelledFlightAssignedError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnavailableGateError {
    flight: FlightIdentifier,
    gate: GateIdentifier,
    known: bool,
}

impl UnavailableGateError {
    pub fn unknown(flight: FlightIdentifier, gate: GateIdentifier) -> Self {
        Self {
            flight,
            gate,
            known: false,
        }
    }

    pub fn closed(flight: FlightIdentifier, gate: GateIdentifier) -> Self {
        Self {
            flight,
            gate,
            known: true,
        }
    }

    pub fn flight(&self) -> &FlightIdentifier {
        &self.flight
    }

    pub fn gate(&self) -> &GateIdentifier {
        &self.gate
    }

    /// `false` if the gate does not exist at all, `true` if it exists but is closed.
    pub fn is_closed(&self) -> bool {
        self.known
    }
}

impl std::fmt::Display for UnavailableGateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = if self.known { "closed" } else { "unknown" };
        write!(
            f,
            "Flight {} is assigned to {} gate {}",
            self.flight, reason, self.gate
        )
    }
}

impl std::error::Error for UnavailableGateError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GateOverlapError {
    gate: GateIdentifier,
    first: FlightIdentifier,
    second: FlightIdentifier,
}

impl GateOverlapError {
    pub fn new(gate: GateIdentifier, first: FlightIdentifier, second: FlightIdentifier) -> Self {
        Self {
            gate,
            first,
            second,
        }
    }

    pub fn gate(&self) -> &GateIdentifier {
        &self.gate
    }

    pub fn first(&self) -> &FlightIdentifier {
        &self.first
    }

    pub fn second(&self) -> &FlightIdentifier {
        &self.second
    }
}

impl std::fmt::Display for GateOverlapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Flights {} and {} overlap on gate {}",
            self.first, self.second, self.gate
        )
    }
}

impl std::error::Error for GateOverlapError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnassignedFlightError {
    flight: FlightIdentifier,
}

impl UnassignedFlightError {
    pub fn new(flight: FlightIdentifier) -> Self {
        Self { flight }
    }

    pub fn flight(&self) -> &FlightIdentifier {
        &self.flight
    }
}

impl std::fmt::Display for UnassignedFlightError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Active flight {} has no gate", self.flight)
    }
}

impl std::error::Error for UnassignedFlightError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssignmentValidationError {
    UnknownFlight(UnknownAssignedFlightError),
    CancelledFlight(CancelledFlightAssignedError),
    UnavailableGate(UnavailableGateError),
    Overlap(GateOverlapError),
    Unassigned(UnassignedFlightError),
}

impl std::fmt::Display for AssignmentValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentValidationError::UnknownFlight(e) => write!(f, "{}", e),
            AssignmentValidationError::CancelledFlight(e) => write!(f, "{}", e),
            AssignmentValidationError::UnavailableGate(e) => write!(f, "{}", e),
            AssignmentValidationError::Overlap(e) => write!(f, "{}", e),
            AssignmentValidationError::Unassigned(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AssignmentValidationError {}

impl From<UnknownAssignedFlightError> for AssignmentValidationError {
    fn from(err: UnknownAssignedFlightError) -> Self {
        AssignmentValidationError::UnknownFlight(err)
    }
}

impl From<CancelledFlightAssignedError> for AssignmentValidationError {
    fn from(err: CancelledFlightAssignedError) -> Self {
        AssignmentValidationError::CancelledFlight(err)
    }
}

impl From<UnavailableGateError> for AssignmentValidationError {
    fn from(err: UnavailableGateError) -> Self {
        AssignmentValidationError::UnavailableGate(err)
    }
}

impl From<GateOverlapError> for AssignmentValidationError {
    fn from(err: GateOverlapError) -> Self {
        AssignmentValidationError::Overlap(err)
    }
}

impl From<UnassignedFlightError> for AssignmentValidationError {
    fn from(err: UnassignedFlightError) -> Self {
        AssignmentValidationError::Unassigned(err)
    }
}
