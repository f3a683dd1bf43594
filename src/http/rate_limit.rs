use crate::config::{pacing_interval, ConfigError};
use log::trace;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Fixed-interval pacing: at most one dispatch per `1s / rps`.
///
/// Idle time earns no credit, so a long pause never allows a burst. The lock is
/// held across the pacing sleep, which serializes concurrent callers onto
/// successive slots instead of letting them race on a stale timestamp.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_dispatch: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(requests_per_second: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            min_interval: pacing_interval(requests_per_second)?,
            last_dispatch: Mutex::new(None),
        })
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Suspend until the next dispatch is permitted, then claim the slot.
    pub async fn throttle(&self) {
        let mut last = self.last_dispatch.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                trace!("pacing dispatch for {:?}", wait);
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}
