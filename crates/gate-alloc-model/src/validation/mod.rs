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

pub mod err;

use crate::{
    problem::{
        flight::{Flight, FlightContainer},
        gate::{GateContainer, GateIdentifier},
    },
    solution::assignment::Assignment,
    validation::err::{
        AssignmentValidationError, CancelledFlightAssignedError, GateOverlapError,
        UnassignedFlightError, UnavailableGateError, UnknownAssignedFlightError,
    },
};
use gate_alloc_core::prelude::TimeDelta;
use std::collections::BTreeMap;

/// Checks assignments against the hard constraints.
///
/// `validate_hard` covers everything a degraded assignment must still
/// satisfy; `validate_stable` additionally requires every active flight to
/// hold a gate.
#[derive(Debug, Clone)]
pub struct AssignmentValidator;

impl AssignmentValidator {
    #[inline]
    pub fn validate_flights_known(
        assignment: &Assignment,
        flights: &FlightContainer,
    ) -> Result<(), AssignmentValidationError> {
        for (fid, _) in assignment.iter() {
            match flights.get(fid) {
                None => return Err(UnknownAssignedFlightError::new(fid.clone()).into()),
                Some(f) if !f.is_active() => {
                    return Err(CancelledFlightAssignedError::new(fid.clone()).into());
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    #[inline]
    pub fn validate_gates_open(
        assignment: &Assignment,
        gates: &GateContainer,
    ) -> Result<(), UnavailableGateError> {
        for (fid, gid) in assignment.iter() {
            match gates.get(gid) {
                None => return Err(UnavailableGateError::unknown(fid.clone(), gid.clone())),
                Some(g) if g.is_closed() => {
                    return Err(UnavailableGateError::closed(fid.clone(), gid.clone()));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Per gate, sorts the assigned flights in time order and checks
    /// neighbours. A collision anywhere on a gate implies one between two
    /// neighbours in that order, so neighbours suffice.
    pub fn validate_no_overlap(
        assignment: &Assignment,
        flights: &FlightContainer,
        buffer: TimeDelta<i64>,
    ) -> Result<(), GateOverlapError> {
        let mut by_gate: BTreeMap<&GateIdentifier, Vec<&Flight>> = BTreeMap::new();
        for (fid, gid) in assignment.iter() {
            if let Some(f) = flights.get(fid).filter(|f| f.is_active()) {
                by_gate.entry(gid).or_default().push(f);
            }
        }

        for (gid, mut on_gate) in by_gate {
            on_gate.sort_by(|a, b| a.time_order_key().cmp(&b.time_order_key()));
            for pair in on_gate.windows(2) {
                if pair[0].conflicts_with(pair[1], buffer) {
                    return Err(GateOverlapError::new(
                        gid.clone(),
                        pair[0].id().clone(),
                        pair[1].id().clone(),
                    ));
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub fn validate_complete(
        assignment: &Assignment,
        flights: &FlightContainer,
    ) -> Result<(), UnassignedFlightError> {
        match flights.iter_active().find(|f| !assignment.contains(f.id())) {
            Some(f) => Err(UnassignedFlightError::new(f.id().clone())),
            None => Ok(()),
        }
    }

    pub fn validate_hard(
        assignment: &Assignment,
        flights: &FlightContainer,
        gates: &GateContainer,
        buffer: TimeDelta<i64>,
    ) -> Result<(), AssignmentValidationError> {
        Self::validate_flights_known(assignment, flights)?;
        Self::validate_gates_open(assignment, gates)?;
        Self::validate_no_overlap(assignment, flights, buffer)?;
        Ok(())
    }

    pub fn validate_stable(
        assignment: &Assignment,
        flights: &FlightContainer,
        gates: &GateContainer,
        buffer: TimeDelta<i64>,
    ) -> Result<(), AssignmentValidationError> {
        Self::validate_hard(assignment, flights, gates, buffer)?;
        Self::validate_complete(assignment, flights)?;
        Ok(())
    }
}
