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

use crate::monitor::limits::SearchLimits;
use gate_alloc_core::prelude::TimeDelta;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables of the reassignment engine. Every field has a default, so a
/// partial JSON document is enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Wall-clock budget per solve. `None` searches to completion.
    pub time_limit_ms: Option<u64>,
    pub node_limit: Option<u64>,
    /// Minimum gap between two flights on one gate.
    pub turnaround_buffer_minutes: u32,
    /// How often a stale commit is re-solved against the newer state.
    pub commit_retries: u32,
    pub sample_every: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: Some(60_000),
            node_limit: None,
            turnaround_buffer_minutes: 0,
            commit_retries: 3,
            sample_every: 64,
        }
    }
}

impl EngineConfig {
    #[inline]
    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit_ms = limit.map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
        self
    }

    #[inline]
    pub fn with_node_limit(mut self, limit: Option<u64>) -> Self {
        self.node_limit = limit;
        self
    }

    #[inline]
    pub fn with_buffer_minutes(mut self, minutes: u32) -> Self {
        self.turnaround_buffer_minutes = minutes;
        self
    }

    #[inline]
    pub fn with_commit_retries(mut self, retries: u32) -> Self {
        self.commit_retries = retries;
        self
    }

    #[inline]
    pub fn buffer(&self) -> TimeDelta<i64> {
        TimeDelta::new(i64::from(self.turnaround_buffer_minutes))
    }

    pub fn limits(&self) -> SearchLimits {
        SearchLimits::unbounded()
            .with_max_duration(self.time_limit_ms.map(Duration::from_millis))
            .with_max_nodes(self.node_limit)
            .with_sample_every(self.sample_every)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_falls_back_to_defaults() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{"turnaround_buffer_minutes": 30}"#).unwrap();
        assert_eq!(cfg.turnaround_buffer_minutes, 30);
        assert_eq!(cfg.commit_retries, 3);
        assert_eq!(cfg.buffer(), TimeDelta::new(30));
        assert_eq!(cfg.limits().max_duration, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_null_time_limit_is_unbounded() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"time_limit_ms": null}"#).unwrap();
        assert!(cfg.limits().is_unbounded());
    }

    #[test]
    fn test_builders() {
        let cfg = EngineConfig::default()
            .with_time_limit(Some(Duration::from_millis(250)))
            .with_node_limit(Some(10))
            .with_buffer_minutes(15)
            .with_commit_retries(0);
        let limits = cfg.limits();
        assert_eq!(limits.max_duration, Some(Duration::from_millis(250)));
        assert_eq!(limits.max_nodes, Some(10));
        assert_eq!(cfg.commit_retries, 0);
    }
}
