use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// A non-success response, reduced to its status and a readable message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("GitHub API error ({status}): {message}")]
pub struct ApiFailure {
    pub status: u16,
    pub message: String,
}

impl ApiFailure {
    pub fn code(&self) -> &'static str {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        map_status_to_code(status).0
    }

    pub fn retriable(&self) -> bool {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        map_status_to_code(status).1
    }
}

/// Build a failure from a non-success status and its raw body.
///
/// A JSON body with a `message` field contributes that field; anything else
/// (plain text, JSON without `message`, an empty body) is used verbatim.
pub fn classify(status: StatusCode, raw_body: &str) -> ApiFailure {
    let message = match serde_json::from_str::<Value>(raw_body) {
        Ok(Value::Object(map)) => match map.get("message") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => raw_body.to_string(),
        },
        _ => raw_body.to_string(),
    };
    ApiFailure {
        status: status.as_u16(),
        message,
    }
}

// Advisory label and retriable hint; never consulted for message extraction.
pub fn map_status_to_code(status: StatusCode) -> (&'static str, bool) {
    match status {
        StatusCode::BAD_REQUEST => ("bad_request", false),
        StatusCode::UNAUTHORIZED => ("unauthorized", false),
        StatusCode::FORBIDDEN => ("forbidden", false),
        StatusCode::NOT_FOUND => ("not_found", false),
        StatusCode::CONFLICT => ("conflict", false),
        StatusCode::UNPROCESSABLE_ENTITY => ("validation_failed", false),
        StatusCode::TOO_MANY_REQUESTS => ("rate_limited", true),
        s if s.is_server_error() => ("upstream_error", true),
        _ => ("server_error", false),
    }
}
