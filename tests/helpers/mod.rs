#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use simple_kafka::config::StreamConfig;
use simple_kafka::stream::{StreamManager, TopicOptions};

pub fn setup_manager() -> Arc<StreamManager> {
    Arc::new(StreamManager::new(StreamConfig::default()))
}

/// Fresh manager with `topic` already created at the given retention.
pub fn setup_topic(topic: &str, retention: usize) -> Arc<StreamManager> {
    let manager = setup_manager();
    manager
        .create_topic(topic, TopicOptions::with_retention(retention))
        .unwrap();
    manager
}

pub fn produce_ids(manager: &StreamManager, topic: &str, ids: std::ops::RangeInclusive<u64>) {
    for id in ids {
        manager.produce(topic, json!({ "id": id }), None).unwrap();
    }
}

pub struct Benchmark {
    pub name: String,
    pub start: Instant,
    pub count: usize,
    pub samples: Vec<Duration>,
}

impl Benchmark {
    pub fn start(name: &str, count: usize) -> Self {
        println!("🚀 STARTING: {}", name);
        Self {
            name: name.to_string(),
            start: Instant::now(),
            count,
            samples: Vec::with_capacity(count),
        }
    }

    pub fn record(&mut self, duration: Duration) {
        self.samples.push(duration);
    }

    pub fn stop(mut self) {
        let total_duration = self.start.elapsed();
        let secs = total_duration.as_secs_f64();
        let ops_sec = self.count as f64 / secs;

        self.samples.sort();
        let len = self.samples.len();

        let p50 = self.samples.get(len * 50 / 100).unwrap_or(&Duration::ZERO).as_micros();
        let p95 = self.samples.get(len * 95 / 100).unwrap_or(&Duration::ZERO).as_micros();
        let p99 = self.samples.get(len * 99 / 100).unwrap_or(&Duration::ZERO).as_micros();
        let max = self.samples.last().unwrap_or(&Duration::ZERO).as_micros();

        println!("\n📊 {}", self.name);
        println!("   Throughput:  {:.0} ops/sec", ops_sec);
        println!("   Total Time:  {:.2?}", total_duration);
        println!("   Latency (µs): p50: {} | p95: {} | p99: {} | Max: {}", p50, p95, p99, max);
        println!("   Count:       {}\n", self.count);
    }
}
