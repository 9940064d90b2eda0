//! Keyed GCRA rate limiter using the governor crate.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::{Clock, DefaultClock};
use governor::middleware::StateInformationMiddleware;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter as GovernorRateLimiter};

use synthea_core::ports::{RateLimitError, RateLimitResult, RateLimiter};

type KeyedRateLimiter = GovernorRateLimiter<
    String,
    DefaultKeyedStateStore<String>,
    DefaultClock,
    StateInformationMiddleware,
>;

/// Per-minute quota for the ingress throttle.
#[derive(Debug, Clone, Copy)]
pub struct IngressQuota {
    pub per_minute: u32,
}

/// Coarse per-client limiter using the GCRA algorithm.
///
/// Burst capacity equals `per_minute`; one cell is replenished every
/// `60s / per_minute`. Used in front of all routes, keyed by client address.
pub struct GcraRateLimiter {
    limiter: KeyedRateLimiter,
    clock: DefaultClock,
    quota: IngressQuota,
}

impl GcraRateLimiter {
    pub fn new(quota: IngressQuota) -> Result<Self, RateLimitError> {
        let burst = NonZeroU32::new(quota.per_minute).ok_or_else(|| {
            RateLimitError::InvalidConfig("ingress quota must be non-zero".to_string())
        })?;

        let limiter = GovernorRateLimiter::keyed(Quota::per_minute(burst))
            .with_middleware::<StateInformationMiddleware>();

        Ok(Self {
            limiter,
            clock: DefaultClock::default(),
            quota,
        })
    }
}

#[async_trait]
impl RateLimiter for GcraRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        match self.limiter.check_key(&key.to_string()) {
            Ok(snapshot) => Ok(RateLimitResult {
                allowed: true,
                remaining: snapshot.remaining_burst_capacity(),
                reset_after: snapshot.quota().replenish_interval(),
                limit: self.quota.per_minute,
                window: Duration::from_secs(60),
            }),
            Err(not_until) => Ok(RateLimitResult {
                allowed: false,
                remaining: 0,
                reset_after: not_until.wait_time_from(self.clock.now()),
                limit: self.quota.per_minute,
                window: Duration::from_secs(60),
            }),
        }
    }
}
