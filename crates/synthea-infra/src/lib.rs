//! # Synthea Infrastructure
//!
//! Concrete implementations of the ports defined in `synthea-core`.
//! Everything here is in-process; state is lost on restart.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - Sliding-window limiter and in-memory store only
//! - `ingress-throttle` - Per-client GCRA limiter via governor

pub mod clock;
pub mod conversation;
pub mod rate_limit;
pub mod responder;

pub use clock::{ManualClock, SystemClock};
pub use conversation::InMemoryConversationStore;
pub use rate_limit::{RateLimitConfig, SlidingWindowRateLimiter};
pub use responder::EchoResponder;

#[cfg(feature = "ingress-throttle")]
pub use rate_limit::{GcraRateLimiter, IngressQuota};
