//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod clock;
mod conversation;
mod rate_limit;
mod responder;

pub use clock::Clock;
pub use conversation::{ConversationStore, StoreError};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use responder::Responder;
