use serde::Serialize;

#[derive(Serialize, Debug, Clone)]
pub struct StreamBrokerSnapshot {
    pub total_topics: usize,
    pub total_messages: u64,
    pub topics: Vec<TopicSummary>,
}

#[derive(Serialize, Debug, Clone)]
pub struct TopicSummary {
    pub name: String,
    pub retention: usize,
    pub size: usize,
    pub earliest_offset: u64,
    pub latest_offset: Option<u64>,
    pub next_offset: u64,
    pub evicted: u64, // dropped by retention or clear
    pub cursors: Vec<CursorSummary>,
}

#[derive(Serialize, Debug, Clone)]
pub struct CursorSummary {
    pub id: String,
    pub position: u64,
    pub lag: u64,
    pub delivered: u64,
    pub last_poll_ms: Option<u64>,
}

impl StreamBrokerSnapshot {
    pub fn topic(&self, name: &str) -> Option<&TopicSummary> {
        self.topics.iter().find(|t| t.name == name)
    }
}

impl TopicSummary {
    pub fn cursor(&self, id: &str) -> Option<&CursorSummary> {
        self.cursors.iter().find(|c| c.id == id)
    }
}
