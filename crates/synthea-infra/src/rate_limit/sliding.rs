//! Per-key sliding-log rate limiter.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use synthea_core::ports::{Clock, RateLimitError, RateLimitResult, RateLimiter};

use crate::clock::SystemClock;

/// Sliding window configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

/// Rate limiter that keeps the timestamp of every admitted request per key.
///
/// A request is admitted when fewer than `max_requests` timestamps fall in
/// the trailing window. Expired timestamps are evicted lazily, only when the
/// same key is checked again. Rejected requests are not recorded.
/// Note: Limits are per-process, not distributed across instances.
pub struct SlidingWindowRateLimiter {
    windows: Mutex<HashMap<String, VecDeque<u64>>>,
    clock: Arc<dyn Clock>,
    config: RateLimitConfig,
    window_millis: u64,
}

impl SlidingWindowRateLimiter {
    pub fn new(config: RateLimitConfig) -> Result<Self, RateLimitError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: RateLimitConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, RateLimitError> {
        if config.max_requests == 0 {
            return Err(RateLimitError::InvalidConfig(
                "max_requests must be at least 1".to_string(),
            ));
        }
        if config.window.is_zero() {
            return Err(RateLimitError::InvalidConfig(
                "window must be longer than zero".to_string(),
            ));
        }
        let window_millis = u64::try_from(config.window.as_millis()).map_err(|_| {
            RateLimitError::InvalidConfig("window must fit in u64 milliseconds".to_string())
        })?;

        Ok(Self {
            windows: Mutex::new(HashMap::new()),
            clock,
            config,
            window_millis,
        })
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Time until `oldest` leaves the window.
    fn until_expiry(&self, oldest: u64, now: u64) -> Duration {
        // Entries equal to the cutoff are still counted, so expiry is one ms later.
        let expires_at = oldest.saturating_add(self.window_millis).saturating_add(1);
        Duration::from_millis(expires_at.saturating_sub(now))
    }
}

#[async_trait]
impl RateLimiter for SlidingWindowRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        let now = self.clock.now_millis();
        let cutoff = now.saturating_sub(self.window_millis);
        let limit = self.config.max_requests as usize;

        let mut windows = self.windows.lock().await;
        let timestamps = windows.entry(key.to_string()).or_default();

        while timestamps.front().is_some_and(|&ts| ts < cutoff) {
            timestamps.pop_front();
        }

        if timestamps.len() >= limit {
            let oldest = timestamps.front().copied().unwrap_or(now);
            return Ok(RateLimitResult {
                allowed: false,
                remaining: 0,
                reset_after: self.until_expiry(oldest, now),
                limit: self.config.max_requests,
                window: self.config.window,
            });
        }

        timestamps.push_back(now);
        let oldest = timestamps.front().copied().unwrap_or(now);

        Ok(RateLimitResult {
            allowed: true,
            remaining: (limit - timestamps.len()) as u32,
            reset_after: self.until_expiry(oldest, now),
            limit: self.config.max_requests,
            window: self.config.window,
        })
    }
}
