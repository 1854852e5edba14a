use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    #[error("Topic '{0}' not found")]
    TopicNotFound(String),

    #[error("Topic '{topic}' already exists with retention {existing} (requested {requested})")]
    RetentionConflict {
        topic: String,
        existing: usize,
        requested: usize,
    },

    #[error("Invalid retention {0}: a topic must retain at least one message")]
    InvalidRetention(usize),
}

pub type StreamResult<T> = Result<T, StreamError>;
