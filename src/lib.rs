pub mod config;
pub mod dashboard;
pub mod stream;
pub mod utils;

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::config::StreamConfig;
use crate::stream::{StreamBrokerSnapshot, StreamManager};

// ========================================
// ENGINE
// ========================================

/// Owner of the broker state for one session.
/// Cheap to clone (the registry is behind an Arc); build a fresh one per test.
#[derive(Clone)]
pub struct BrokerEngine {
    pub stream: Arc<StreamManager>,
    pub start_time: Instant,
}

#[derive(Serialize)]
pub struct SystemSnapshot {
    pub uptime_seconds: u64,
    pub server_time: String,
    pub stream: StreamBrokerSnapshot,
}

impl BrokerEngine {
    pub fn new(config: StreamConfig) -> Self {
        Self {
            stream: Arc::new(StreamManager::new(config)),
            start_time: Instant::now(),
        }
    }

    pub fn system_snapshot(&self) -> SystemSnapshot {
        SystemSnapshot {
            uptime_seconds: self.start_time.elapsed().as_secs(),
            server_time: chrono::Utc::now().to_rfc3339(),
            stream: self.stream.get_snapshot(),
        }
    }
}
