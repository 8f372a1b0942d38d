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
use std::time::{Duration, Instant};

/// Stops the search once the wall-clock budget is spent.
///
/// The clock is polled every `sample_every` nodes; between polls the last
/// verdict is reused.
#[derive(Debug)]
pub struct TimeLimitMonitor {
    start_time: Instant,
    time_limit: Duration,
    sample_every: u32,
    since_sample: u32,
    expired: bool,
}

impl TimeLimitMonitor {
    #[inline]
    pub fn new(time_limit: Duration) -> Self {
        Self::with_sampling(time_limit, 1)
    }

    #[inline]
    pub fn with_sampling(time_limit: Duration, sample_every: u32) -> Self {
        Self {
            start_time: Instant::now(),
            time_limit,
            sample_every: sample_every.max(1),
            since_sample: 0,
            expired: time_limit.is_zero(),
        }
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    #[inline]
    fn sample(&mut self) {
        self.since_sample = 0;
        self.expired = self.start_time.elapsed() >= self.time_limit;
    }
}

impl TerminationCheck for TimeLimitMonitor {
    #[inline]
    fn should_terminate_search(&self) -> bool {
        self.expired
    }
}

impl LifecycleMonitor for TimeLimitMonitor {
    #[inline]
    fn on_search_start(&mut self) {
        self.start_time = Instant::now();
        self.sample();
    }

    #[inline]
    fn on_search_end(&mut self) {}
}

impl NodeEventMonitor for TimeLimitMonitor {
    #[inline]
    fn on_node_expanded(&mut self) {
        self.since_sample += 1;
        if self.since_sample >= self.sample_every {
            self.sample();
        }
    }

    #[inline]
    fn on_incumbent_improved(&mut self, _fitness: &Fitness) {}
}

impl SearchMonitor for TimeLimitMonitor {
    #[inline]
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn short_sleep_ms(ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }

    #[test]
    fn test_not_terminated_right_after_start() {
        let mut m = TimeLimitMonitor::new(Duration::from_millis(250));
        m.on_search_start();
        assert!(!m.should_terminate_search());
    }

    #[test]
    fn test_terminates_after_elapsed() {
        let mut m = TimeLimitMonitor::new(Duration::from_millis(10));
        m.on_search_start();
        short_sleep_ms(25);
        m.on_node_expanded();
        assert!(m.should_terminate_search());
    }

    #[test]
    fn test_zero_limit_terminates_immediately() {
        let mut m = TimeLimitMonitor::new(Duration::ZERO);
        assert!(m.should_terminate_search());
        m.on_search_start();
        assert!(m.should_terminate_search());
    }

    #[test]
    fn test_sampling_defers_clock_reads() {
        let mut m = TimeLimitMonitor::with_sampling(Duration::from_millis(5), 3);
        m.on_search_start();
        short_sleep_ms(15);
        m.on_node_expanded();
        m.on_node_expanded();
        assert!(!m.should_terminate_search());
        m.on_node_expanded();
        assert!(m.should_terminate_search());
    }

    #[test]
    fn test_on_search_start_resets_timer() {
        let mut m = TimeLimitMonitor::new(Duration::from_millis(5));
        short_sleep_ms(15);
        m.on_node_expanded();
        assert!(m.should_terminate_search());
        m.on_search_start();
        assert!(!m.should_terminate_search());
        assert_eq!(m.name(), "TimeLimitMonitor");
    }
}
