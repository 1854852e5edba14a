//! Producer / Consumer: thin clients over a shared `StreamManager`.
//!
//! A `Consumer` uses one cursor id across every topic it subscribes to, so a
//! group id behaves like a consumer group with a single member.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::stream::commands::SeekTarget;
use crate::stream::error::StreamResult;
use crate::stream::message::{Message, Payload};
use crate::stream::stream_manager::StreamManager;

// ==========================================
// PRODUCER
// ==========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordMetadata {
    pub topic: String,
    pub offset: u64,
}

#[derive(Clone)]
pub struct Producer {
    manager: Arc<StreamManager>,
}

impl Producer {
    pub fn new(manager: Arc<StreamManager>) -> Self {
        Self { manager }
    }

    pub fn send(
        &self,
        topic: &str,
        payload: impl Into<Payload>,
        key: Option<String>,
    ) -> StreamResult<RecordMetadata> {
        let offset = self.manager.produce(topic, payload, key)?;
        Ok(RecordMetadata { topic: topic.to_string(), offset })
    }
}

// ==========================================
// CONSUMER
// ==========================================

#[derive(Debug, Clone)]
pub struct ConsumerRecord {
    pub topic: String,
    pub message: Arc<Message>,
}

pub struct Consumer {
    manager: Arc<StreamManager>,
    id: String,
    topics: Vec<String>,
    // Generated ids are private to this consumer, so its cursors go away with it.
    ephemeral: bool,
}

impl Consumer {
    /// Subscribes `group_id` (or a generated `consumer-xxxxxxxx` id) to `topics`.
    pub fn new(
        manager: Arc<StreamManager>,
        group_id: Option<&str>,
        topics: &[&str],
    ) -> StreamResult<Self> {
        let (id, ephemeral) = match group_id {
            Some(id) => (id.to_string(), false),
            None => (format!("consumer-{}", &Uuid::new_v4().simple().to_string()[..8]), true),
        };

        let consumer = Self {
            manager,
            id,
            topics: topics.iter().map(|t| t.to_string()).collect(),
            ephemeral,
        };
        // On failure the dropped consumer releases what it already subscribed.
        for topic in &consumer.topics {
            consumer.manager.subscribe(topic, &consumer.id)?;
        }
        Ok(consumer)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Up to `max_per_topic` records from each subscribed topic, in subscription order.
    pub fn poll(&self, max_per_topic: usize) -> StreamResult<Vec<ConsumerRecord>> {
        let mut records = Vec::new();
        for topic in &self.topics {
            let batch = self.manager.poll(topic, &self.id, max_per_topic)?;
            records.extend(batch.messages.into_iter().map(|message| ConsumerRecord {
                topic: topic.clone(),
                message,
            }));
        }
        Ok(records)
    }

    /// Total lag across subscribed topics.
    pub fn lag(&self) -> StreamResult<u64> {
        let mut total = 0;
        for topic in &self.topics {
            total += self.manager.consumer_lag(topic, &self.id)?;
        }
        Ok(total)
    }

    pub fn seek_to_beginning(&self) -> StreamResult<()> {
        for topic in &self.topics {
            self.manager.seek(topic, &self.id, SeekTarget::Beginning)?;
        }
        Ok(())
    }

    /// Ends the consumer. Cursors under a generated id are removed; a group id keeps
    /// its positions so another consumer with the same id can resume.
    /// Dropping a consumer does the same, ignoring topics deleted in the meantime.
    pub fn close(mut self) -> StreamResult<()> {
        let result = self.release_cursors();
        self.ephemeral = false;
        result
    }

    fn release_cursors(&self) -> StreamResult<()> {
        if !self.ephemeral {
            return Ok(());
        }
        for topic in &self.topics {
            self.manager.unsubscribe(topic, &self.id)?;
        }
        Ok(())
    }
}

impl Drop for Consumer {
    fn drop(&mut self) {
        if !self.ephemeral {
            return;
        }
        for topic in &self.topics {
            let _ = self.manager.unsubscribe(topic, &self.id);
        }
    }
}
