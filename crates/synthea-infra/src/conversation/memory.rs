//! In-memory conversation store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use synthea_core::domain::Turn;
use synthea_core::ports::{ConversationStore, StoreError};

/// In-memory conversation store using a HashMap with async RwLock.
///
/// Histories are unbounded unless a per-session cap is set, in which case
/// the oldest turns are dropped first.
/// Note: Data is lost on process restart.
pub struct InMemoryConversationStore {
    sessions: RwLock<HashMap<String, Vec<Turn>>>,
    max_turns: Option<usize>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::with_max_turns(None)
    }

    pub fn with_max_turns(max_turns: Option<usize>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_turns,
        }
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn append(&self, key: &str, turns: Vec<Turn>) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        let history = sessions.entry(key.to_string()).or_default();
        history.extend(turns);

        if let Some(max) = self.max_turns {
            if history.len() > max {
                let excess = history.len() - max;
                history.drain(..excess);
                tracing::debug!(session_key = %key, dropped = excess, "Trimmed conversation history");
            }
        }

        Ok(())
    }

    async fn history(&self, key: &str) -> Result<Vec<Turn>, StoreError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(key).cloned().unwrap_or_default())
    }

    async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
