use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::dashboard::stream::{get_stream, get_stream_messages, get_system, get_topic_stats, get_topics};
use crate::BrokerEngine;

/// Read-only monitor API. No route mutates broker state.
pub fn dashboard_router(engine: BrokerEngine) -> Router {
    Router::new()
        .route("/api/system", get(get_system))
        .route("/api/stream", get(get_stream))
        .route("/api/stream/topics", get(get_topics))
        .route("/api/stream/{topic}", get(get_topic_stats))
        .route("/api/stream/{topic}/messages", get(get_stream_messages))
        .layer(CompressionLayer::new())
        .with_state(engine)
}

/// Serves the dashboard until the future is dropped or the listener fails.
pub async fn serve_dashboard(engine: BrokerEngine, listener: TcpListener) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("Dashboard available at http://{}", addr);
    axum::serve(listener, dashboard_router(engine)).await
}

pub async fn start_dashboard_server(engine: BrokerEngine, host: &str, port: u16) -> std::io::Result<()> {
    let listener = TcpListener::bind((host, port)).await?;
    serve_dashboard(engine, listener).await
}
