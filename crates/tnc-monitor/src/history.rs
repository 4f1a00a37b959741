//! Bounded broadcast history
//!
//! New WebSocket clients receive the recent stream before going live, so
//! the bridge keeps the last N serialized payloads in insertion order and
//! drops the oldest once full.

use std::collections::VecDeque;

/// Fixed-capacity FIFO of broadcast payloads
#[derive(Debug)]
pub struct History {
    entries: VecDeque<String>,
    capacity: usize,
}

impl History {
    /// Create a history holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a payload, evicting the oldest entry when full
    pub fn push(&mut self, payload: String) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(payload);
    }

    /// Copy of all retained payloads, oldest first
    pub fn snapshot(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    /// Number of retained payloads
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been retained yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all retained payloads
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
