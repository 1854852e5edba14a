//! Stream Manager: the broker registry.
//!
//! Structure:
//! - StreamManager: maps topic names to shared `Topic` handles, created lazily.
//! - Topic (1 per name): owns its log and the cursors reading it.
//!
//! Every operation is synchronous and returns immediately: a poll with no new
//! data is an empty result, never a wait. Topics are independent: a write on
//! topic A never blocks topic B.

use std::collections::BTreeSet;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{info, warn};

use crate::config::StreamConfig;
use crate::stream::commands::{SeekTarget, TopicOptions};
use crate::stream::error::{StreamError, StreamResult};
use crate::stream::message::Payload;
use crate::stream::snapshot::StreamBrokerSnapshot;
use crate::stream::topic::{PollResult, Topic, TopicStats};

pub struct StreamManager {
    topics: DashMap<String, Arc<Topic>>,
    config: StreamConfig,
}

impl StreamManager {
    pub fn new(config: StreamConfig) -> Self {
        Self {
            topics: DashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    // ==========================================
    // TOPICS
    // ==========================================

    /// Creates the topic if absent. An existing topic is returned unchanged,
    /// unless the requested retention differs, which is a conflict.
    pub fn create_topic(&self, name: &str, options: TopicOptions) -> StreamResult<Arc<Topic>> {
        let requested = options.retention;
        let retention = requested.unwrap_or(self.config.default_retention);
        if retention == 0 {
            return Err(StreamError::InvalidRetention(retention));
        }

        match self.topics.entry(name.to_string()) {
            Entry::Occupied(entry) => {
                let existing = entry.get().retention();
                match requested {
                    Some(requested) if requested != existing => {
                        warn!(topic = %name, existing, requested, "retention conflict on create_topic");
                        Err(StreamError::RetentionConflict {
                            topic: name.to_string(),
                            existing,
                            requested,
                        })
                    }
                    _ => Ok(Arc::clone(entry.get())),
                }
            }
            Entry::Vacant(entry) => {
                info!(topic = %name, retention, "creating topic");
                let topic = Arc::new(Topic::new(name.to_string(), retention));
                entry.insert(Arc::clone(&topic));
                Ok(topic)
            }
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.topics.contains_key(name)
    }

    pub fn list_topics(&self) -> BTreeSet<String> {
        self.topics.iter().map(|e| e.key().clone()).collect()
    }

    pub fn topic_stats(&self, name: &str) -> StreamResult<TopicStats> {
        Ok(self.get_topic(name)?.stats())
    }

    /// Drops the topic together with its cursors. Returns false if it did not exist.
    pub fn delete_topic(&self, name: &str) -> bool {
        let removed = self.topics.remove(name).is_some();
        if removed {
            info!(topic = %name, "topic deleted");
        }
        removed
    }

    /// Evicts every retained message of the topic. Returns how many were dropped.
    pub fn clear_topic(&self, name: &str) -> StreamResult<usize> {
        let dropped = self.get_topic(name)?.clear();
        info!(topic = %name, dropped, "topic cleared");
        Ok(dropped)
    }

    /// Discards all topics and cursors.
    pub fn reset(&self) {
        let count = self.topics.len();
        self.topics.clear();
        info!(topics = count, "stream broker reset");
    }

    // ==========================================
    // PRODUCE / CONSUME
    // ==========================================

    /// Appends to `topic` and returns the assigned offset. The message is
    /// visible to every poll that starts after this returns.
    pub fn produce(
        &self,
        topic: &str,
        payload: impl Into<Payload>,
        key: Option<String>,
    ) -> StreamResult<u64> {
        let topic = self.topic_for_use(topic)?;
        Ok(topic.append(payload.into(), key))
    }

    /// Reads up to `max_messages` from the cursor position and advances the cursor.
    /// The cursor is created at the earliest retained offset on first use.
    pub fn poll(&self, topic: &str, cursor_id: &str, max_messages: usize) -> StreamResult<PollResult> {
        let topic = self.topic_for_use(topic)?;
        Ok(topic.poll(cursor_id, max_messages))
    }

    /// Non-advancing read, no cursor involved. Same fast-forward rule as `poll`.
    pub fn read(&self, topic: &str, offset: u64, limit: usize) -> StreamResult<PollResult> {
        Ok(self.get_topic(topic)?.read(offset, limit))
    }

    // ==========================================
    // CURSORS
    // ==========================================

    /// Registers a cursor without reading. Idempotent; returns its position.
    pub fn subscribe(&self, topic: &str, cursor_id: &str) -> StreamResult<u64> {
        let topic = self.topic_for_use(topic)?;
        let cursor = topic.cursor(cursor_id);
        let position = cursor.lock().position();
        Ok(position)
    }

    /// Moves the cursor forward to `offset` (never backwards, never past the log end).
    pub fn commit(&self, topic: &str, cursor_id: &str, offset: u64) -> StreamResult<u64> {
        let topic = self.topic_for_use(topic)?;
        Ok(topic.commit(cursor_id, offset))
    }

    /// Explicit reset of a cursor position, clamped into the retained window.
    pub fn seek(&self, topic: &str, cursor_id: &str, target: SeekTarget) -> StreamResult<u64> {
        let topic = self.topic_for_use(topic)?;
        Ok(topic.seek(cursor_id, target))
    }

    /// Drops a cursor from the topic. Returns false if it was not registered.
    pub fn unsubscribe(&self, topic: &str, cursor_id: &str) -> StreamResult<bool> {
        Ok(self.get_topic(topic)?.remove_cursor(cursor_id))
    }

    pub fn cursor_position(&self, topic: &str, cursor_id: &str) -> StreamResult<Option<u64>> {
        Ok(self.get_topic(topic)?.cursor_position(cursor_id))
    }

    pub fn list_cursors(&self, topic: &str) -> StreamResult<Vec<String>> {
        Ok(self.get_topic(topic)?.cursor_ids())
    }

    /// Log end offset minus cursor position; 0 when caught up.
    pub fn consumer_lag(&self, topic: &str, cursor_id: &str) -> StreamResult<u64> {
        Ok(self.get_topic(topic)?.lag(cursor_id))
    }

    // ==========================================
    // MONITOR
    // ==========================================

    pub fn get_snapshot(&self) -> StreamBrokerSnapshot {
        // Clone handles first so no map shard stays locked while reading topics.
        let handles: Vec<Arc<Topic>> = self.topics.iter().map(|e| Arc::clone(e.value())).collect();

        let mut topics: Vec<_> = handles.iter().map(|t| t.summary()).collect();
        topics.sort_by(|a, b| a.name.cmp(&b.name));

        StreamBrokerSnapshot {
            total_topics: topics.len(),
            total_messages: topics.iter().map(|t| t.size as u64).sum(),
            topics,
        }
    }

    // --- Internal ---

    fn get_topic(&self, name: &str) -> StreamResult<Arc<Topic>> {
        self.topics
            .get(name)
            .map(|e| Arc::clone(e.value()))
            .ok_or_else(|| StreamError::TopicNotFound(name.to_string()))
    }

    /// Lookup for operations that may create the topic (unless in strict mode).
    fn topic_for_use(&self, name: &str) -> StreamResult<Arc<Topic>> {
        match self.get_topic(name) {
            Ok(topic) => Ok(topic),
            Err(_) if self.config.auto_create_topics => self.create_topic(name, TopicOptions::default()),
            Err(e) => Err(e),
        }
    }
}

impl Default for StreamManager {
    fn default() -> Self {
        Self::new(StreamConfig::default())
    }
}
