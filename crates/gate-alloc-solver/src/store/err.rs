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

use gate_alloc_model::prelude::Generation;

/// A commit was based on a generation that is no longer current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConcurrencyConflict {
    expected: Generation,
    actual: Generation,
}

impl ConcurrencyConflict {
    pub fn new(expected: Generation, actual: Generation) -> Self {
        Self { expected, actual }
    }

    /// Generation the writer based its work on.
    pub fn expected(&self) -> Generation {
        self.expected
    }

    /// Generation found in the store at commit time.
    pub fn actual(&self) -> Generation {
        self.actual
    }
}

impl std::fmt::Display for ConcurrencyConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Stale commit: based on {} but the store holds {}",
            self.expected, self.actual
        )
    }
}

impl std::error::Error for ConcurrencyConflict {}
