//! Topic: append-only, offset-indexed, retention-bounded log for one stream.
//!
//! `TopicLog` is the pure state (no concurrency primitives).
//! `Topic` is the shared handle owned by the `StreamManager`: the log behind a
//! reader-writer lock plus the cursors of every consumer reading it.
//!
//! Lock order: cursor map shard -> cursor mutex -> log lock.

use std::collections::VecDeque;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::debug;

use crate::stream::commands::SeekTarget;
use crate::stream::cursor::Cursor;
use crate::stream::message::{Message, Payload};
use crate::stream::snapshot::{CursorSummary, TopicSummary};
use crate::utils::current_time_ms;

// ==========================================
// READ RESULTS & STATS
// ==========================================

/// Messages in increasing-offset order plus the offset to resume from.
#[derive(Debug, Clone, Default)]
pub struct PollResult {
    pub messages: Vec<Arc<Message>>,
    pub next_offset: u64,
}

impl PollResult {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopicStats {
    /// Oldest retained offset; equals `next_offset` when nothing is retained.
    pub earliest_offset: u64,
    /// Newest retained offset, `None` when nothing is retained.
    pub latest_offset: Option<u64>,
    /// Offset the next append will receive (log end).
    pub next_offset: u64,
    pub size: usize,
}

// ==========================================
// TOPIC LOG (Pure State)
// ==========================================

pub struct TopicLog {
    pub name: String,
    retention: usize,
    messages: VecDeque<Arc<Message>>,
    start_offset: u64,
    next_offset: u64,
    evicted: u64,
}

impl TopicLog {
    pub fn new(name: String, retention: usize) -> Self {
        Self {
            name,
            retention,
            messages: VecDeque::new(),
            start_offset: 0,
            next_offset: 0,
            evicted: 0,
        }
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    pub fn earliest_offset(&self) -> u64 {
        self.start_offset
    }

    pub fn next_offset(&self) -> u64 {
        self.next_offset
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages dropped so far by retention or `clear`.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Assigns the next offset, stores the message and enforces retention.
    pub fn append(&mut self, payload: Payload, key: Option<String>) -> u64 {
        let offset = self.next_offset;
        self.messages.push_back(Arc::new(Message {
            offset,
            timestamp: current_time_ms(),
            key,
            payload,
        }));
        self.next_offset += 1;

        let evicted = self.evict();
        if evicted > 0 {
            debug!(topic = %self.name, evicted, earliest = self.start_offset, "retention eviction");
        }
        offset
    }

    fn evict(&mut self) -> usize {
        let mut evicted = 0;
        while self.messages.len() > self.retention {
            self.messages.pop_front();
            self.start_offset += 1;
            evicted += 1;
        }
        self.evicted += evicted as u64;
        evicted
    }

    /// Reads up to `limit` messages starting at `offset`.
    /// An offset below the retention window is fast-forwarded to `earliest_offset`.
    pub fn read_from(&self, offset: u64, limit: usize) -> PollResult {
        let start = if offset < self.start_offset {
            debug!(
                topic = %self.name,
                requested = offset,
                earliest = self.start_offset,
                "fast-forwarding read past evicted range"
            );
            self.start_offset
        } else {
            offset
        };

        if start >= self.next_offset {
            return PollResult { messages: Vec::new(), next_offset: start };
        }

        let relative_idx = (start - self.start_offset) as usize;
        let messages: Vec<Arc<Message>> = self
            .messages
            .range(relative_idx..)
            .take(limit)
            .cloned()
            .collect();
        let next_offset = start + messages.len() as u64;

        PollResult { messages, next_offset }
    }

    /// Drops every retained message. Offsets keep increasing afterwards.
    pub fn clear(&mut self) -> usize {
        let dropped = self.messages.len();
        self.messages.clear();
        self.start_offset = self.next_offset;
        self.evicted += dropped as u64;
        dropped
    }

    pub fn stats(&self) -> TopicStats {
        TopicStats {
            earliest_offset: self.start_offset,
            latest_offset: self.messages.back().map(|m| m.offset),
            next_offset: self.next_offset,
            size: self.messages.len(),
        }
    }
}

// ==========================================
// TOPIC (Shared Handle)
// ==========================================

pub struct Topic {
    name: String,
    retention: usize,
    created_at: u64,
    log: RwLock<TopicLog>,
    cursors: DashMap<String, Arc<Mutex<Cursor>>>,
}

impl Topic {
    pub(crate) fn new(name: String, retention: usize) -> Self {
        Self {
            log: RwLock::new(TopicLog::new(name.clone(), retention)),
            name,
            retention,
            created_at: current_time_ms(),
            cursors: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn stats(&self) -> TopicStats {
        self.log.read().stats()
    }

    pub fn cursor_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.cursors.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub(crate) fn append(&self, payload: Payload, key: Option<String>) -> u64 {
        self.log.write().append(payload, key)
    }

    pub(crate) fn read(&self, offset: u64, limit: usize) -> PollResult {
        self.log.read().read_from(offset, limit)
    }

    pub(crate) fn clear(&self) -> usize {
        self.log.write().clear()
    }

    /// Existing cursor for `id`, or a new one at the current earliest offset.
    pub(crate) fn cursor(&self, id: &str) -> Arc<Mutex<Cursor>> {
        if let Some(existing) = self.cursors.get(id) {
            return Arc::clone(existing.value());
        }
        let entry = self.cursors.entry(id.to_string()).or_insert_with(|| {
            let start = self.log.read().earliest_offset();
            debug!(topic = %self.name, cursor = %id, start, "cursor created");
            Arc::new(Mutex::new(Cursor::new(id.to_string(), self.name.clone(), start)))
        });
        Arc::clone(entry.value())
    }

    /// Forgets a cursor. A later poll with the same id starts again at the earliest offset.
    pub(crate) fn remove_cursor(&self, id: &str) -> bool {
        let removed = self.cursors.remove(id).is_some();
        if removed {
            debug!(topic = %self.name, cursor = %id, "cursor removed");
        }
        removed
    }

    pub(crate) fn find_cursor(&self, id: &str) -> Option<Arc<Mutex<Cursor>>> {
        self.cursors.get(id).map(|e| Arc::clone(e.value()))
    }

    /// Reads from the cursor position and advances the cursor, atomically per cursor.
    pub(crate) fn poll(&self, cursor_id: &str, limit: usize) -> PollResult {
        let cursor = self.cursor(cursor_id);
        let mut cursor = cursor.lock();
        let batch = self.read(cursor.position(), limit);
        cursor.record_poll(batch.messages.len(), batch.next_offset);
        batch
    }

    /// Monotonic advance, capped at the log end. Returns the resulting position.
    pub(crate) fn commit(&self, cursor_id: &str, offset: u64) -> u64 {
        let cursor = self.cursor(cursor_id);
        let mut cursor = cursor.lock();
        let log_end = self.log.read().next_offset();
        cursor.advance_to(offset.min(log_end));
        cursor.position()
    }

    pub(crate) fn seek(&self, cursor_id: &str, target: SeekTarget) -> u64 {
        let cursor = self.cursor(cursor_id);
        let mut cursor = cursor.lock();
        let stats = self.stats();
        let position = match target {
            SeekTarget::Beginning => stats.earliest_offset,
            SeekTarget::End => stats.next_offset,
            SeekTarget::Offset(offset) => offset.clamp(stats.earliest_offset, stats.next_offset),
        };
        cursor.seek(position);
        debug!(topic = %self.name, cursor = %cursor_id, position, "cursor seek");
        position
    }

    pub(crate) fn cursor_position(&self, cursor_id: &str) -> Option<u64> {
        self.find_cursor(cursor_id).map(|c| c.lock().position())
    }

    /// Lag of `cursor_id`; an unknown cursor reports what it would have if created now.
    pub(crate) fn lag(&self, cursor_id: &str) -> u64 {
        let stats = self.stats();
        match self.find_cursor(cursor_id) {
            Some(cursor) => cursor.lock().lag(stats.next_offset),
            None => stats.next_offset - stats.earliest_offset,
        }
    }

    pub(crate) fn summary(&self) -> TopicSummary {
        // Cursors before the log: positions read first can never exceed the log end read after.
        let mut cursors: Vec<CursorSummary> = self
            .cursors
            .iter()
            .map(|entry| {
                let cursor = entry.value().lock();
                CursorSummary {
                    id: cursor.id.clone(),
                    position: cursor.position(),
                    lag: 0,
                    delivered: cursor.delivered(),
                    last_poll_ms: cursor.last_poll_ms(),
                }
            })
            .collect();
        cursors.sort_by(|a, b| a.id.cmp(&b.id));

        let (stats, evicted) = {
            let log = self.log.read();
            (log.stats(), log.evicted())
        };
        for cursor in &mut cursors {
            cursor.lag = stats.next_offset.saturating_sub(cursor.position);
        }

        TopicSummary {
            name: self.name.clone(),
            retention: self.retention,
            size: stats.size,
            earliest_offset: stats.earliest_offset,
            latest_offset: stats.latest_offset,
            next_offset: stats.next_offset,
            evicted,
            cursors,
        }
    }
}

// ==========================================
// TESTS
// ==========================================
