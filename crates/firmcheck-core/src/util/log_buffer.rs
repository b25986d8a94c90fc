//! Bounded, append-only log storage.
//!
//! Entries are stored oldest first. Once `capacity` is reached the oldest
//! entry is evicted on every push, so memory stays bounded however long a
//! process runs.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogBuffer {
    capacity: usize,
    entries: VecDeque<String>,
    /// Total entries ever pushed, evicted ones included.
    pushed: u64,
}

impl LogBuffer {
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity.min(256)),
            pushed: 0,
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(line.into());
        self.pushed += 1;
    }

    /// Time order, oldest first.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Display order, newest first.
    pub fn newest_first(&self) -> impl Iterator<Item = &str> {
        self.entries().rev()
    }

    /// Retained entries pushed after the first `mark` pushes.
    ///
    /// Pair with [`pushed`](Self::pushed) to stream new lines to an observer.
    pub fn since(&self, mark: u64) -> impl Iterator<Item = &str> {
        let fresh = self.pushed.saturating_sub(mark);
        let retained = self.entries.len() as u64;
        let skip = retained.saturating_sub(fresh) as usize;
        self.entries().skip(skip)
    }

    pub fn pushed(&self) -> u64 {
        self.pushed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut log = LogBuffer::new(3);
        for i in 0..5 {
            log.push(format!("line {i}"));
        }
        let kept: Vec<_> = log.entries().collect();
        assert_eq!(kept, vec!["line 2", "line 3", "line 4"]);
        assert_eq!(log.pushed(), 5);
    }

    #[test]
    fn newest_first_reverses_time_order() {
        let mut log = LogBuffer::new(10);
        log.push("a");
        log.push("b");
        assert_eq!(log.newest_first().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(log.last(), Some("b"));
    }

    #[test]
    fn since_returns_only_fresh_lines() {
        let mut log = LogBuffer::new(10);
        log.push("a");
        let mark = log.pushed();
        log.push("b");
        log.push("c");
        assert_eq!(log.since(mark).collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(log.since(log.pushed()).count(), 0);
    }

    #[test]
    fn since_is_bounded_by_retention() {
        let mut log = LogBuffer::new(2);
        for l in ["a", "b", "c", "d"] {
            log.push(l);
        }
        assert_eq!(log.since(0).collect::<Vec<_>>(), vec!["c", "d"]);
    }

    #[test]
    fn zero_capacity_is_raised() {
        let mut log = LogBuffer::new(0);
        log.push("x");
        log.push("y");
        assert_eq!(log.capacity(), 1);
        assert_eq!(log.entries().collect::<Vec<_>>(), vec!["y"]);
    }
}
