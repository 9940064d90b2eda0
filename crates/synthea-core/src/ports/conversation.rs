use async_trait::async_trait;

use crate::domain::Turn;

/// Conversation store trait - per-session chat history.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Append turns, in order, to the history of `key`. Creates the history if missing.
    async fn append(&self, key: &str, turns: Vec<Turn>) -> Result<(), StoreError>;

    /// Snapshot of the history of `key`. Unknown keys yield an empty history.
    async fn history(&self, key: &str) -> Result<Vec<Turn>, StoreError>;

    /// Number of sessions with a history.
    async fn session_count(&self) -> usize;
}

/// Conversation store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Backend error: {0}")]
    Backend(String),
}
