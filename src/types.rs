use serde::{Deserialize, Serialize};
use serde_json::Value;

// Most recently observed REST quota envelope, shared by the HTTP and tools layers.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct QuotaSnapshot {
    pub limit: i64,
    pub remaining: i64,
    pub reset_epoch_seconds: i64,
}

impl QuotaSnapshot {
    pub fn reset_at(&self) -> Option<String> {
        chrono::DateTime::<chrono::Utc>::from_timestamp(self.reset_epoch_seconds, 0)
            .map(|dt| dt.to_rfc3339())
    }
}

/// A successful response body, decoded by its declared content type.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Json(Value),
    Text(String),
}

impl Decoded {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Decoded::Json(v) => Some(v),
            Decoded::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Decoded::Text(s) => Some(s),
            Decoded::Json(_) => None,
        }
    }

    /// Look up a string field by JSON pointer, e.g. `/object/sha`.
    pub fn str_at(&self, pointer: &str) -> Option<&str> {
        self.as_json()
            .and_then(|v| v.pointer(pointer))
            .and_then(|v| v.as_str())
    }

    /// Render for a text-only consumer: pretty JSON or the raw text.
    pub fn to_text(&self) -> String {
        match self {
            Decoded::Json(v) => serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string()),
            Decoded::Text(s) => s.clone(),
        }
    }
}
