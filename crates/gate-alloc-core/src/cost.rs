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

/// Integral movement cost. Raw distances are decimal; they are stored
/// multiplied by [`COST_SCALE`] so objective arithmetic stays exact.
pub type Cost = i64;

pub const COST_SCALE: i64 = 100;

/// Converts a raw decimal distance into a scaled [`Cost`], rounding to the
/// nearest unit. Returns `None` for negative, non-finite or oversized input.
#[inline]
pub fn scale_cost(raw: f64) -> Option<Cost> {
    if !raw.is_finite() || raw < 0.0 {
        return None;
    }
    let scaled = (raw * COST_SCALE as f64).round();
    if scaled > i64::MAX as f64 {
        return None;
    }
    Some(scaled as Cost)
}

#[inline]
pub fn unscale_cost(cost: Cost) -> f64 {
    cost as f64 / COST_SCALE as f64
}
