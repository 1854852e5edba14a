use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::dashboard::utils::payload_to_dashboard_value;
use crate::stream::{StreamError, TopicStats};
use crate::utils::format_time_ms;
use crate::BrokerEngine;

#[derive(Serialize)]
pub struct MessagePreview {
    pub offset: u64,
    pub timestamp: String,
    pub key: Option<String>,
    pub payload: Value,
}

#[derive(Serialize)]
pub struct StreamMessages {
    pub messages: Vec<MessagePreview>,
    pub from_offset: u64,
    pub limit: usize,
    pub earliest_offset: u64,
    pub next_offset: u64,
}

#[derive(Deserialize)]
pub struct StreamMessagesQuery {
    pub from: Option<u64>,
    pub limit: Option<usize>,
}

impl IntoResponse for StreamError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            StreamError::TopicNotFound(_) => (StatusCode::NOT_FOUND, "TOPIC_NOT_FOUND"),
            StreamError::RetentionConflict { .. } => (StatusCode::CONFLICT, "RETENTION_CONFLICT"),
            StreamError::InvalidRetention(_) => (StatusCode::BAD_REQUEST, "INVALID_RETENTION"),
        };
        let body = Json(json!({ "error": code, "message": self.to_string() }));
        (status, body).into_response()
    }
}

pub async fn get_stream(State(engine): State<BrokerEngine>) -> impl IntoResponse {
    Json(engine.stream.get_snapshot())
}

pub async fn get_topics(State(engine): State<BrokerEngine>) -> impl IntoResponse {
    Json(engine.stream.list_topics())
}

pub async fn get_topic_stats(
    State(engine): State<BrokerEngine>,
    Path(topic): Path<String>,
) -> Result<Json<TopicStats>, StreamError> {
    Ok(Json(engine.stream.topic_stats(&topic)?))
}

/// Non-advancing preview. Without `from`, shows the newest `limit` messages.
pub async fn get_stream_messages(
    State(engine): State<BrokerEngine>,
    Path(topic): Path<String>,
    Query(query): Query<StreamMessagesQuery>,
) -> Result<Json<StreamMessages>, StreamError> {
    let config = engine.stream.config();
    let limit = query
        .limit
        .unwrap_or(config.default_poll_limit)
        .min(config.max_poll_limit);

    let stats = engine.stream.topic_stats(&topic)?;
    let from_offset = query
        .from
        .unwrap_or_else(|| stats.next_offset.saturating_sub(limit as u64))
        .max(stats.earliest_offset);

    let batch = engine.stream.read(&topic, from_offset, limit)?;
    let messages = batch
        .messages
        .iter()
        .map(|msg| MessagePreview {
            offset: msg.offset,
            timestamp: format_time_ms(msg.timestamp),
            key: msg.key.clone(),
            payload: payload_to_dashboard_value(&msg.payload),
        })
        .collect();

    Ok(Json(StreamMessages {
        messages,
        from_offset,
        limit,
        earliest_offset: stats.earliest_offset,
        next_offset: stats.next_offset,
    }))
}

pub async fn get_system(State(engine): State<BrokerEngine>) -> impl IntoResponse {
    Json(engine.system_snapshot())
}
