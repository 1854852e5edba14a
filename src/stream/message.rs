use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

// ==========================================
// PAYLOAD
// ==========================================

/// Opaque message body. The broker never looks inside it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Payload {
    Json(Value),
    Text(String),
    Raw(Bytes),
}

impl Payload {
    /// Best-effort decode of serialized bytes: JSON first, then UTF-8 text, else raw.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        if let Ok(value) = serde_json::from_slice::<Value>(&bytes) {
            return Payload::Json(value);
        }
        match std::str::from_utf8(&bytes) {
            Ok(text) => Payload::Text(text.to_string()),
            Err(_) => Payload::Raw(bytes),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Payload::Raw(bytes)
    }
}

// ==========================================
// MESSAGE
// ==========================================

#[derive(Clone, Debug, Serialize)]
pub struct Message {
    pub offset: u64,
    /// Append time, milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub key: Option<String>,
    pub payload: Payload,
}
