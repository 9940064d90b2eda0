//! Domain-level error types.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::ports::{RateLimitError, StoreError};

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    RateLimited(RateLimitExceeded),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Details of a rejected request for a session over its limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitExceeded {
    pub limit: u32,
    pub window: Duration,
    pub retry_after: Duration,
}

impl fmt::Display for RateLimitExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "You have exceeded more than {} requests ", self.limit)?;
        match self.window.as_secs() {
            60 => write!(f, "per minute")?,
            secs => write!(f, "per {} seconds", secs)?,
        }
        write!(f, ". Please try again later.")
    }
}

impl From<RateLimitError> for DomainError {
    fn from(err: RateLimitError) -> Self {
        DomainError::Internal(err.to_string())
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        DomainError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rate_limit_message() {
        let err = DomainError::RateLimited(RateLimitExceeded {
            limit: 10,
            window: Duration::from_secs(60),
            retry_after: Duration::from_secs(12),
        });
        assert_eq!(
            err.to_string(),
            "You have exceeded more than 10 requests per minute. Please try again later."
        );
    }

    #[test]
    fn test_custom_window_message() {
        let exceeded = RateLimitExceeded {
            limit: 3,
            window: Duration::from_secs(10),
            retry_after: Duration::ZERO,
        };
        assert_eq!(
            exceeded.to_string(),
            "You have exceeded more than 3 requests per 10 seconds. Please try again later."
        );
    }
}
