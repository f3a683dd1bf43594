use crate::types::QuotaSnapshot;
use reqwest::header::HeaderMap;
use std::sync::RwLock;

pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

fn header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<i64>().ok())
}

/// Parse the quota triple; `None` unless all three are present and numeric.
pub fn extract_quota(headers: &HeaderMap) -> Option<QuotaSnapshot> {
    Some(QuotaSnapshot {
        limit: header_i64(headers, LIMIT_HEADER)?,
        remaining: header_i64(headers, REMAINING_HEADER)?,
        reset_epoch_seconds: header_i64(headers, RESET_HEADER)?,
    })
}

/// Last complete quota envelope seen on any response. Advisory only.
#[derive(Debug, Default)]
pub struct QuotaTracker {
    snapshot: RwLock<Option<QuotaSnapshot>>,
}

impl QuotaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_from_headers(&self, headers: &HeaderMap) {
        let Some(next) = extract_quota(headers) else {
            return;
        };
        let mut slot = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(next);
    }

    pub fn snapshot(&self) -> Option<QuotaSnapshot> {
        *self.snapshot.read().unwrap_or_else(|e| e.into_inner())
    }
}
