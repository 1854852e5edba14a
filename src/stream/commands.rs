use serde::Deserialize;

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TopicOptions {
    /// Max retained messages. Falls back to `StreamConfig::default_retention`.
    pub retention: Option<usize>,
}

impl TopicOptions {
    pub fn with_retention(retention: usize) -> Self {
        Self { retention: Some(retention) }
    }
}

/// Explicit cursor reposition. The only way a cursor moves backwards.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeekTarget {
    Beginning,
    End,
    Offset(u64),
}
