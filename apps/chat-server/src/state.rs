//! Application state - shared across all handlers.

use std::sync::Arc;

use synthea_core::ports::{Clock, RateLimitError, RateLimiter};
use synthea_core::{ChatService, ChatServiceConfig};
use synthea_infra::{EchoResponder, InMemoryConversationStore, SlidingWindowRateLimiter, SystemClock};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
    /// Per-client throttle in front of all routes, when configured.
    pub ingress: Option<Arc<dyn RateLimiter>>,
}

impl AppState {
    /// Build the application state with the in-memory adapters.
    pub fn new(config: &AppConfig) -> Result<Self, RateLimitError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<Self, RateLimitError> {
        let limiter = SlidingWindowRateLimiter::with_clock(config.rate_limit.clone(), clock)?;
        let store = InMemoryConversationStore::with_max_turns(config.history_max_turns);

        let chat = ChatService::new(
            Arc::new(limiter),
            Arc::new(store),
            Arc::new(EchoResponder),
            ChatServiceConfig {
                default_session_key: config.default_session_key.clone(),
            },
        );

        let ingress = build_ingress(config.ingress_per_minute)?;

        tracing::info!(
            history_max_turns = ?config.history_max_turns,
            ingress_throttle = ingress.is_some(),
            "Application state initialized"
        );

        Ok(Self {
            chat: Arc::new(chat),
            ingress,
        })
    }
}

#[cfg(feature = "ingress-throttle")]
fn build_ingress(per_minute: Option<u32>) -> Result<Option<Arc<dyn RateLimiter>>, RateLimitError> {
    use synthea_infra::{GcraRateLimiter, IngressQuota};

    match per_minute {
        Some(per_minute) => {
            let limiter = GcraRateLimiter::new(IngressQuota { per_minute })?;
            Ok(Some(Arc::new(limiter)))
        }
        None => Ok(None),
    }
}

#[cfg(not(feature = "ingress-throttle"))]
fn build_ingress(per_minute: Option<u32>) -> Result<Option<Arc<dyn RateLimiter>>, RateLimitError> {
    if per_minute.is_some() {
        tracing::warn!(
            "INGRESS_RATE_LIMIT_PER_MINUTE set but ingress-throttle feature is disabled - ignoring"
        );
    }
    Ok(None)
}
