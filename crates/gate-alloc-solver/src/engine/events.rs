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

use crate::engine::err::{EventError, UnknownFlightError, UnknownGateError};
use gate_alloc_core::prelude::TimeDelta;
use gate_alloc_model::prelude::{FlightContainer, FlightIdentifier, GateContainer, GateIdentifier};
use serde::{Deserialize, Serialize};

/// An operational disruption. Unknown `type` tags fail deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisruptionEvent {
    CloseGate {
        #[serde(alias = "gateId")]
        gate_id: GateIdentifier,
    },
    DelayFlight {
        #[serde(alias = "flightId")]
        flight_id: FlightIdentifier,
        /// May be negative.
        minutes: i64,
    },
}

impl DisruptionEvent {
    #[inline]
    pub fn close_gate(gate: impl Into<GateIdentifier>) -> Self {
        DisruptionEvent::CloseGate {
            gate_id: gate.into(),
        }
    }

    #[inline]
    pub fn delay_flight(flight: impl Into<FlightIdentifier>, minutes: i64) -> Self {
        DisruptionEvent::DelayFlight {
            flight_id: flight.into(),
            minutes,
        }
    }

    /// Applies the event to a working copy. The copy is left untouched when
    /// the event is rejected.
    pub fn apply(
        &self,
        flights: &mut FlightContainer,
        gates: &mut GateContainer,
    ) -> Result<(), EventError> {
        match self {
            DisruptionEvent::CloseGate { gate_id } => {
                let gate = gates
                    .get_mut(gate_id)
                    .ok_or_else(|| UnknownGateError::new(gate_id.clone()))?;
                gate.close();
            }
            DisruptionEvent::DelayFlight { flight_id, minutes } => {
                let flight = flights
                    .get_mut(flight_id)
                    .ok_or_else(|| UnknownFlightError::new(flight_id.clone()))?;
                flight.apply_delay(TimeDelta::new(*minutes))?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for DisruptionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisruptionEvent::CloseGate { gate_id } => write!(f, "CloseGate({})", gate_id),
            DisruptionEvent::DelayFlight { flight_id, minutes } => {
                write!(f, "DelayFlight({}, {}min)", flight_id, minutes)
            }
        }
    }
}

/// An event dropped from a batch, with its position in the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedEvent {
    pub index: usize,
    pub event: DisruptionEvent,
    pub reason: String,
}

impl RejectedEvent {
    pub fn new(index: usize, event: DisruptionEvent, error: &EventError) -> Self {
        Self {
            index,
            event,
            reason: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::err::ReferentialError;
    use gate_alloc_core::prelude::{TimeInterval, TimePoint};
    use gate_alloc_model::prelude::{Flight, FlightStatus, Gate, Location};

    fn fixture() -> (FlightContainer, GateContainer) {
        let flights = vec![Flight::new(
            FlightIdentifier::from("F1"),
            TimeInterval::new(TimePoint::new(600), TimePoint::new(630)),
            GateIdentifier::from("G1"),
            FlightStatus::Scheduled,
        )]
        .into_iter()
        .collect();
        let gates = vec![Gate::new(
            GateIdentifier::from("G1"),
            Location::Planar([0.0, 0.0]),
            true,
        )]
        .into_iter()
        .collect();
        (flights, gates)
    }

    #[test]
    fn test_deserialize_tagged_events() {
        let events: Vec<DisruptionEvent> = serde_json::from_str(
            r#"[
                {"type": "close_gate", "gate_id": "G1"},
                {"type": "delay_flight", "flightId": "F1", "minutes": -15}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            events,
            vec![
                DisruptionEvent::close_gate("G1"),
                DisruptionEvent::delay_flight("F1", -15),
            ]
        );
    }

    #[test]
    fn test_unknown_shapes_are_rejected() {
        assert!(serde_json::from_str::<DisruptionEvent>(r#"{"type": "open_gate", "gate_id": "G1"}"#).is_err());
        assert!(serde_json::from_str::<DisruptionEvent>(r#"{"type": "delay_flight", "flight_id": "F1"}"#).is_err());
        assert!(serde_json::from_str::<DisruptionEvent>(r#"{"gate_id": "G1"}"#).is_err());
    }

    #[test]
    fn test_apply_close_and_delay() {
        let (mut flights, mut gates) = fixture();
        DisruptionEvent::close_gate("G1")
            .apply(&mut flights, &mut gates)
            .unwrap();
        assert!(!gates.is_open(&GateIdentifier::from("G1")));

        DisruptionEvent::delay_flight("F1", 20)
            .apply(&mut flights, &mut gates)
            .unwrap();
        let f = flights.get(&FlightIdentifier::from("F1")).unwrap();
        assert_eq!(f.arrival(), TimePoint::new(620));
        assert_eq!(f.status(), FlightStatus::Delayed);
    }

    #[test]
    fn test_unknown_references() {
        let (mut flights, mut gates) = fixture();
        let before = (flights.clone(), gates.clone());
        let err = DisruptionEvent::close_gate("G9")
            .apply(&mut flights, &mut gates)
            .unwrap_err();
        assert_eq!(
            err,
            EventError::Referential(ReferentialError::UnknownGate(UnknownGateError::new(
                GateIdentifier::from("G9")
            )))
        );
        let err = DisruptionEvent::delay_flight("F9", 5)
            .apply(&mut flights, &mut gates)
            .unwrap_err();
        assert!(matches!(
            err,
            EventError::Referential(ReferentialError::UnknownFlight(_))
        ));
        assert_eq!((flights, gates), before);
    }

    #[test]
    fn test_overflowing_delay_is_rejected() {
        let (mut flights, mut gates) = fixture();
        let err = DisruptionEvent::delay_flight("F1", i64::MAX)
            .apply(&mut flights, &mut gates)
            .unwrap_err();
        assert!(matches!(err, EventError::DelayOutOfRange(_)));
    }
}
