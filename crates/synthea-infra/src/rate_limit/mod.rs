//! Rate limiting implementations.

mod sliding;

pub use sliding::{RateLimitConfig, SlidingWindowRateLimiter};

#[cfg(feature = "ingress-throttle")]
mod gcra;
#[cfg(feature = "ingress-throttle")]
pub use self::gcra::{GcraRateLimiter, IngressQuota};
