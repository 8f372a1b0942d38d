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

use crate::{
    monitor::search_monitor::{LifecycleMonitor, NodeEventMonitor, SearchMonitor, TerminationCheck},
    state::fitness::Fitness,
};

#[derive(Debug)]
pub struct NodeLimitMonitor {
    node_limit: u64,
    nodes_expanded: u64,
}

impl NodeLimitMonitor {
    #[inline]
    pub fn new(node_limit: u64) -> Self {
        Self {
            node_limit,
            nodes_expanded: 0,
        }
    }

    #[inline]
    pub fn node_limit(&self) -> u64 {
        self.node_limit
    }

    #[inline]
    pub fn nodes_expanded(&self) -> u64 {
        self.nodes_expanded
    }
}

impl TerminationCheck for NodeLimitMonitor {
    #[inline]
    fn should_terminate_search(&self) -> bool {
        self.nodes_expanded >= self.node_limit
    }
}

impl LifecycleMonitor for NodeLimitMonitor {
    #[inline]
    fn on_search_start(&mut self) {
        self.nodes_expanded = 0;
    }

    #[inline]
    fn on_search_end(&mut self) {}
}

impl NodeEventMonitor for NodeLimitMonitor {
    #[inline]
    fn on_node_expanded(&mut self) {
        self.nodes_expanded = self.nodes_expanded.saturating_add(1);
    }

    #[inline]
    fn on_incumbent_improved(&mut self, _fitness: &Fitness) {}
}

impl SearchMonitor for NodeLimitMonitor {
    #[inline]
    fn name(&self) -> &str {
        "NodeLimitMonitor"
    }
}
