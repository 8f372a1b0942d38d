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

use crate::state::fitness::Fitness;

/// Read-only capability to determine whether the search should terminate.
///
/// Polled once per expanded node, so implementations must be cheap.
pub trait TerminationCheck {
    /// Returns `true` if the search should stop as soon as possible.
    fn should_terminate_search(&self) -> bool;
}

/// Search lifecycle hooks.
///
/// `on_search_start` is called once before the first node is expanded and
/// may reset timers or counters. `on_search_end` is called once after the
/// search loop exits, whether it completed or was cut short.
pub trait LifecycleMonitor: TerminationCheck {
    fn on_search_start(&mut self);

    fn on_search_end(&mut self);
}

/// Node-level events raised by tree search.
pub trait NodeEventMonitor: TerminationCheck {
    /// Called once for every branch the search descends into.
    fn on_node_expanded(&mut self);

    /// Called whenever a strictly better complete assignment is found.
    fn on_incumbent_improved(&mut self, fitness: &Fitness);
}

pub trait SearchMonitor: LifecycleMonitor + NodeEventMonitor {
    fn name(&self) -> &str;
}

/// Fans every event out to its children and terminates as soon as any child asks to.
#[derive(Default)]
pub struct CompositeMonitor {
    monitors: Vec<Box<dyn SearchMonitor + Send>>,
}

impl CompositeMonitor {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, monitor: Box<dyn SearchMonitor + Send>) {
        self.monitors.push(monitor);
    }

    #[inline]
    pub fn with(mut self, monitor: Box<dyn SearchMonitor + Send>) -> Self {
        self.push(monitor);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl std::fmt::Debug for CompositeMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.monitors.iter().map(|m| m.name()).collect();
        f.debug_struct("CompositeMonitor")
            .field("monitors", &names)
            .finish()
    }
}

impl TerminationCheck for CompositeMonitor {
    #[inline]
    fn should_terminate_search(&self) -> bool {
        self.monitors.iter().any(|m| m.should_terminate_search())
    }
}

impl LifecycleMonitor for CompositeMonitor {
    fn on_search_start(&mut self) {
        self.monitors.iter_mut().for_each(|m| m.on_search_start());
    }

    fn on_search_end(&mut self) {
        self.monitors.iter_mut().for_each(|m| m.on_search_end());
    }
}

impl NodeEventMonitor for CompositeMonitor {
    #[inline]
    fn on_node_expanded(&mut self) {
        self.monitors.iter_mut().for_each(|m| m.on_node_expanded());
    }

    fn on_incumbent_improved(&mut self, fitness: &Fitness) {
        self.monitors
            .iter_mut()
            .for_each(|m| m.on_incumbent_improved(fitness));
    }
}

impl SearchMonitor for CompositeMonitor {
    fn name(&self) -> &str {
        "CompositeMonitor"
    }
}
