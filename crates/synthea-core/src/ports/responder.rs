use async_trait::async_trait;

/// Produces the assistant's reply to a (trimmed, non-empty) user query.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn reply(&self, query: &str) -> String;
}
