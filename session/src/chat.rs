//! Bounded history of chat lines broadcast to the game room.

use std::collections::VecDeque;

/// Default number of chat lines retained.
pub const DEFAULT_CHAT_HISTORY: usize = 500;

/// Chat history, oldest line first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl ChatLog {
    /// Creates an empty log retaining at most `capacity` lines.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(DEFAULT_CHAT_HISTORY)),
            capacity,
        }
    }

    /// Appends a line, evicting the oldest once the log is full.
    pub fn push(&mut self, line: String) {
        if self.capacity == 0 {
            return;
        }
        while self.lines.len() >= self.capacity {
            let _ = self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// Lines in arrival order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Most recent line.
    #[must_use]
    pub fn latest(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    /// Number of retained lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the log holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new(DEFAULT_CHAT_HISTORY)
    }
}
