//! Chat use case - validate, rate limit, record, reply.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::Turn;
use crate::error::{DomainError, RateLimitExceeded};
use crate::ports::{ConversationStore, RateLimiter, Responder};

/// Message returned when the trimmed query is empty.
pub const QUERY_REQUIRED: &str = "Query is required";

/// Session key used when the client does not send one.
pub const DEFAULT_SESSION_KEY: &str = "default_session";

/// Chat service configuration.
///
/// Limits live with the rate limiter; rejections report whatever the limiter
/// enforced.
#[derive(Debug, Clone)]
pub struct ChatServiceConfig {
    pub default_session_key: String,
}

impl Default for ChatServiceConfig {
    fn default() -> Self {
        Self {
            default_session_key: DEFAULT_SESSION_KEY.to_string(),
        }
    }
}

/// Successful outcome of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub reply: String,
    pub session_key: String,
}

/// One async mutex per session key, created on first use.
#[derive(Default)]
struct SessionLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl SessionLocks {
    async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(key.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }
}

/// Owns the limiter, the conversation store and the responder for the
/// lifetime of the server.
///
/// The limiter check and the history append for one session run under that
/// session's lock, so two concurrent requests can never both pass the check
/// and both append.
pub struct ChatService {
    limiter: Arc<dyn RateLimiter>,
    store: Arc<dyn ConversationStore>,
    responder: Arc<dyn Responder>,
    locks: SessionLocks,
    config: ChatServiceConfig,
}

impl ChatService {
    pub fn new(
        limiter: Arc<dyn RateLimiter>,
        store: Arc<dyn ConversationStore>,
        responder: Arc<dyn Responder>,
        config: ChatServiceConfig,
    ) -> Self {
        Self {
            limiter,
            store,
            responder,
            locks: SessionLocks::default(),
            config,
        }
    }

    /// Handle one user query for a session.
    pub async fn submit(
        &self,
        query: &str,
        session_key: Option<String>,
    ) -> Result<ChatReply, DomainError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::Validation(QUERY_REQUIRED.to_string()));
        }

        let session_key =
            session_key.unwrap_or_else(|| self.config.default_session_key.clone());

        let _guard = self.locks.acquire(&session_key).await;

        let result = self.limiter.check(&session_key).await?;
        if !result.allowed {
            tracing::warn!(session_key = %session_key, "Session rate limit exceeded");
            return Err(DomainError::RateLimited(RateLimitExceeded {
                limit: result.limit,
                window: result.window,
                retry_after: result.reset_after,
            }));
        }

        let reply = self.responder.reply(query).await;
        self.store
            .append(
                &session_key,
                vec![Turn::user(query), Turn::assistant(reply.clone())],
            )
            .await?;

        tracing::debug!(
            session_key = %session_key,
            remaining = result.remaining,
            "Query accepted"
        );

        Ok(ChatReply { reply, session_key })
    }

    /// Conversation recorded so far for a session.
    pub async fn history(&self, session_key: &str) -> Result<Vec<Turn>, DomainError> {
        Ok(self.store.history(session_key).await?)
    }

    pub async fn session_count(&self) -> usize {
        self.store.session_count().await
    }

    pub fn config(&self) -> &ChatServiceConfig {
        &self.config
    }
}
