//! Consumer Cursor: one consumer's read position inside one topic.
//!
//! A cursor never owns messages. It only remembers the next offset to read,
//! plus a couple of counters for the monitor.

use crate::utils::current_time_ms;

#[derive(Debug, Clone)]
pub struct Cursor {
    pub id: String,
    pub topic: String,
    next_offset: u64,
    delivered: u64,
    last_poll_ms: Option<u64>,
}

impl Cursor {
    pub fn new(id: String, topic: String, start_offset: u64) -> Self {
        Self {
            id,
            topic,
            next_offset: start_offset,
            delivered: 0,
            last_poll_ms: None,
        }
    }

    /// Next offset this consumer will read.
    pub fn position(&self) -> u64 {
        self.next_offset
    }

    /// Total messages handed out through this cursor.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    pub fn last_poll_ms(&self) -> Option<u64> {
        self.last_poll_ms
    }

    /// Monotonic advance. Returns false (and does nothing) for a backward move.
    pub fn advance_to(&mut self, offset: u64) -> bool {
        if offset < self.next_offset {
            return false;
        }
        self.next_offset = offset;
        true
    }

    /// Records a completed poll: `count` messages delivered, resume at `resume_offset`.
    pub fn record_poll(&mut self, count: usize, resume_offset: u64) {
        self.advance_to(resume_offset);
        self.delivered += count as u64;
        self.last_poll_ms = Some(current_time_ms());
    }

    /// Explicit reset. May move the cursor backwards.
    pub fn seek(&mut self, offset: u64) {
        self.next_offset = offset;
    }

    /// Unread messages between this cursor and the log end.
    pub fn lag(&self, log_end_offset: u64) -> u64 {
        log_end_offset.saturating_sub(self.next_offset)
    }
}
