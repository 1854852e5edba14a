pub mod client;
pub mod commands;
pub mod cursor;
pub mod error;
pub mod message;
pub mod snapshot;
pub mod stream_manager;
pub mod topic;

pub use client::{Consumer, ConsumerRecord, Producer, RecordMetadata};
pub use commands::{SeekTarget, TopicOptions};
pub use error::{StreamError, StreamResult};
pub use message::{Message, Payload};
pub use snapshot::StreamBrokerSnapshot;
pub use stream_manager::StreamManager;
pub use topic::{PollResult, Topic, TopicStats};
