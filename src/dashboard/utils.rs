// ========================================
// DASHBOARD UTILS
// ========================================

use serde_json::Value;

use crate::stream::Payload;

const TEXT_PREVIEW_LIMIT: usize = 512;

/// Converts a message payload into a JSON value for dashboard visualization.
/// Raw bytes are rendered as a `0x`-prefixed hex string.
pub fn payload_to_dashboard_value(payload: &Payload) -> Value {
    match payload {
        Payload::Json(value) => value.clone(),
        Payload::Text(text) => Value::String(truncate(text)),
        Payload::Raw(bytes) if bytes.is_empty() => Value::Null,
        Payload::Raw(bytes) => Value::String(format!("0x{}", hex::encode(bytes))),
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= TEXT_PREVIEW_LIMIT {
        return text.to_string();
    }
    let cut: String = text.chars().take(TEXT_PREVIEW_LIMIT).collect();
    format!("{}...", cut)
}
