//! Bounded list of recent winners

use std::collections::VecDeque;

use crate::roster::RosterItem;

/// Most-recent-first winner list
#[derive(Debug, Clone, Default)]
pub struct WinnerHistory {
    capacity: usize,
    entries: VecDeque<RosterItem>,
}

impl WinnerHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Record a winner, dropping the oldest beyond capacity
    pub fn push(&mut self, winner: RosterItem) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_front(winner);
        self.entries.truncate(self.capacity);
    }

    pub fn latest(&self) -> Option<&RosterItem> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RosterItem> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<RosterItem> {
        self.entries.iter().cloned().collect()
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

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
