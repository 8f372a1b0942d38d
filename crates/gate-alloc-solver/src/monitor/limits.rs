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

use crate::monitor::{
    node::NodeLimitMonitor, search_monitor::CompositeMonitor, time::TimeLimitMonitor,
};
use std::time::Duration;

/// Budget for one solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_duration: Option<Duration>,
    pub max_nodes: Option<u64>,
    /// How many nodes pass between two clock reads.
    pub sample_every: u32,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_duration: Some(Duration::from_secs(60)),
            max_nodes: None,
            sample_every: 64,
        }
    }
}

impl SearchLimits {
    #[inline]
    pub fn unbounded() -> Self {
        Self {
            max_duration: None,
            max_nodes: None,
            sample_every: 64,
        }
    }

    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.max_duration.is_none() && self.max_nodes.is_none()
    }

    #[inline]
    pub fn with_max_duration(mut self, d: Option<Duration>) -> Self {
        self.max_duration = d;
        self
    }

    #[inline]
    pub fn with_max_nodes(mut self, n: Option<u64>) -> Self {
        self.max_nodes = n;
        self
    }

    #[inline]
    pub fn with_sample_every(mut self, n: u32) -> Self {
        self.sample_every = n.max(1);
        self
    }

    pub fn build_monitor(&self) -> CompositeMonitor {
        let mut monitor = CompositeMonitor::new();
        if let Some(d) = self.max_duration {
            monitor.push(Box::new(TimeLimitMonitor::with_sampling(
                d,
                self.sample_every,
            )));
        }
        if let Some(n) = self.max_nodes {
            monitor.push(Box::new(NodeLimitMonitor::new(n)));
        }
        monitor
    }
}
