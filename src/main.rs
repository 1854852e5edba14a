use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde_json::json;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use simple_kafka::config::Config;
use simple_kafka::dashboard::start_dashboard_server;
use simple_kafka::stream::{StreamManager, TopicOptions};
use simple_kafka::BrokerEngine;

const ORDERS_TOPIC: &str = "ecommerce_orders";
const CUSTOMERS_TOPIC: &str = "ecommerce_customers";
const ORDER_ITEMS_TOPIC: &str = "ecommerce_order_items";
const FRAUD_ALERTS_TOPIC: &str = "ecommerce_fraud_alerts";

// ========================================
// MAIN ENTRY POINT
// ========================================

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let engine = BrokerEngine::new(config.stream.clone());
    for topic in [ORDERS_TOPIC, CUSTOMERS_TOPIC, ORDER_ITEMS_TOPIC, FRAUD_ALERTS_TOPIC] {
        if let Err(e) = engine.stream.create_topic(topic, TopicOptions::default()) {
            warn!("Could not pre-create topic '{}': {}", topic, e);
        }
    }
    info!(
        retention = config.stream.default_retention,
        auto_create = config.stream.auto_create_topics,
        "Simple Kafka broker started"
    );

    let running = Arc::new(AtomicBool::new(true));
    let demo = config.server.demo_producer.then(|| {
        spawn_demo_producer(
            Arc::clone(&engine.stream),
            Duration::from_millis(config.server.demo_interval_ms),
            Arc::clone(&running),
        )
    });

    if config.server.monitor_interval_secs > 0 {
        tokio::spawn(run_monitor(engine.clone(), config.server.monitor_interval_secs));
    }

    let code = tokio::select! {
        res = start_dashboard_server(engine.clone(), &config.server.host, config.server.dashboard_port) => {
            match res {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    error!("Dashboard server failed: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown requested");
            ExitCode::SUCCESS
        }
    };

    running.store(false, Ordering::Relaxed);
    if let Some(handle) = demo {
        join_demo_producer(handle);
    }
    info!("Simple Kafka broker stopped");
    code
}

// ========================================
// MONITOR
// ========================================

async fn run_monitor(engine: BrokerEngine, interval_secs: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.tick().await; // Skip first immediate tick
    loop {
        interval.tick().await;
        let snapshot = engine.stream.get_snapshot();
        for topic in &snapshot.topics {
            let max_lag = topic.cursors.iter().map(|c| c.lag).max().unwrap_or(0);
            info!(
                topic = %topic.name,
                size = topic.size,
                earliest = topic.earliest_offset,
                next = topic.next_offset,
                evicted = topic.evicted,
                cursors = topic.cursors.len(),
                max_lag,
                "topic status"
            );
        }
    }
}

// ========================================
// DEMO PRODUCER
// ========================================

/// Feeds the dashboard topics with placeholder records until `running` is cleared.
fn spawn_demo_producer(
    manager: Arc<StreamManager>,
    interval: Duration,
    running: Arc<AtomicBool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        info!("Demo producer started");
        let mut order_id: u64 = 0;
        while running.load(Ordering::Relaxed) {
            order_id += 1;
            if let Err(e) = produce_demo_order(&manager, order_id) {
                warn!("Demo producer error: {}", e);
            }
            thread::sleep(interval);
        }
        info!(orders = order_id, "Demo producer stopped");
    })
}

/// Waits for the demo thread. Returns false (and logs) if it panicked.
fn join_demo_producer(handle: JoinHandle<()>) -> bool {
    match handle.join() {
        Ok(()) => true,
        Err(_) => {
            error!("Demo producer thread panicked");
            false
        }
    }
}

fn produce_demo_order(
    manager: &StreamManager,
    order_id: u64,
) -> Result<(), simple_kafka::stream::StreamError> {
    let customer_id = Uuid::new_v4().to_string();
    let key = Some(order_id.to_string());

    manager.produce(
        CUSTOMERS_TOPIC,
        json!({ "customer_id": customer_id, "event": "order_placed" }),
        Some(customer_id.clone()),
    )?;

    let amount = (order_id * 37 % 500) as f64 + 9.99;
    manager.produce(
        ORDERS_TOPIC,
        json!({ "order_id": order_id, "customer_id": customer_id, "amount": amount }),
        key.clone(),
    )?;

    for line in 1..=(order_id % 3 + 1) {
        manager.produce(
            ORDER_ITEMS_TOPIC,
            json!({ "order_id": order_id, "line": line }),
            key.clone(),
        )?;
    }

    if order_id % 10 == 0 {
        manager.produce(
            FRAUD_ALERTS_TOPIC,
            json!({ "order_id": order_id, "amount": amount, "reason": "demo" }),
            key,
        )?;
    }
    Ok(())
}
