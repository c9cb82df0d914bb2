// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Bounded history of allocation and deallocation outcomes.
//!
//! The log keeps the [`EVENT_LOG_CAPACITY`] most recent events and evicts
//! the oldest first. Queries see at most [`RECENT_EVENT_LIMIT`] of them.

use address_space::ProcessId;
use std::collections::VecDeque;
use std::fmt;
use std::time::SystemTime;

/// Number of events retained.
pub const EVENT_LOG_CAPACITY: usize = 10;

/// Number of events exposed by recent-event queries.
pub const RECENT_EVENT_LIMIT: usize = 5;

/// What a logged command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EventKind {
    Allocation,
    AllocationFailed,
    Deallocation,
    DeallocationFailed,
}

impl EventKind {
    pub fn is_failure(self) -> bool {
        matches!(self, Self::AllocationFailed | Self::DeallocationFailed)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Allocation => "Allocation",
            Self::AllocationFailed => "Allocation Failed",
            Self::Deallocation => "Deallocation",
            Self::DeallocationFailed => "Deallocation Failed",
        };
        f.write_str(label)
    }
}

/// One logged command outcome.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Event {
    pub timestamp: SystemTime,
    pub process_id: ProcessId,
    pub kind: EventKind,
    /// Human-readable description of the outcome.
    pub detail: String,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.process_id, self.kind, self.detail)
    }
}

/// FIFO-bounded event history.
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<Event>,
    capacity: usize,
}

impl EventLog {
    /// Creates an empty log holding [`EVENT_LOG_CAPACITY`] events.
    pub fn new() -> Self {
        Self::with_capacity(EVENT_LOG_CAPACITY)
    }

    /// Creates an empty log holding at most `capacity` events (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an event stamped with the current time, evicting the oldest
    /// if the log is full.
    pub fn record(&mut self, process_id: ProcessId, kind: EventKind, detail: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(Event {
            timestamp: SystemTime::now(),
            process_id,
            kind,
            detail: detail.into(),
        });
    }

    /// Up to `limit` most recent events, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<Event> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(log: &mut EventLog, n: u32) {
        for i in 1..=n {
            log.record(ProcessId(i), EventKind::Allocation, format!("event {i}"));
        }
    }

    #[test]
    fn test_empty() {
        let log = EventLog::new();
        assert!(log.is_empty());
        assert!(log.recent(RECENT_EVENT_LIMIT).is_empty());
    }

    #[test]
    fn test_evicts_oldest() {
        let mut log = EventLog::new();
        fill(&mut log, 12);
        assert_eq!(log.len(), EVENT_LOG_CAPACITY);

        let all = log.recent(usize::MAX);
        assert_eq!(all.first().map(|e| e.process_id), Some(ProcessId(3)));
        assert_eq!(all.last().map(|e| e.process_id), Some(ProcessId(12)));
    }

    #[test]
    fn test_recent_is_chronological_tail() {
        let mut log = EventLog::new();
        fill(&mut log, 8);
        let ids: Vec<u32> = log
            .recent(RECENT_EVENT_LIMIT)
            .iter()
            .map(|e| e.process_id.get())
            .collect();
        assert_eq!(ids, vec![4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_recent_with_fewer_entries() {
        let mut log = EventLog::new();
        fill(&mut log, 2);
        assert_eq!(log.recent(RECENT_EVENT_LIMIT).len(), 2);
    }

    #[test]
    fn test_display() {
        let mut log = EventLog::with_capacity(1);
        log.record(ProcessId(4), EventKind::AllocationFailed, "no room");
        let text = log.recent(1)[0].to_string();
        assert_eq!(text, "[P4] Allocation Failed: no room");
        assert!(EventKind::AllocationFailed.is_failure());
    }
}
