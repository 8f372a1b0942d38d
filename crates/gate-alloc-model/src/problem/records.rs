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

use crate::problem::flight::FlightStatus;
use serde::{Deserialize, Serialize};

/// Flight as delivered by the data feed. Times are minutes on the
/// operational clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub id: String,
    #[serde(alias = "originalGateId")]
    pub original_gate_id: String,
    pub arrival: i64,
    pub departure: i64,
    #[serde(default)]
    pub status: FlightStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateRecord {
    pub id: String,
    pub coordinates: Vec<f64>,
    #[serde(default = "default_open", alias = "isOpen")]
    pub is_open: bool,
}

fn default_open() -> bool {
    true
}

/// Undirected distance between two gates, in the feed's decimal units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceRecord {
    #[serde(alias = "gateIdA")]
    pub gate_a: String,
    #[serde(alias = "gateIdB")]
    pub gate_b: String,
    pub cost: f64,
}

/// A complete operational snapshot in feed form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub gates: Vec<GateRecord>,
    pub flights: Vec<FlightRecord>,
    #[serde(default)]
    pub distances: Vec<DistanceRecord>,
}
