//! Canned reply generator.

use async_trait::async_trait;

use synthea_core::ports::Responder;

/// Echoes the query back as `You said: <query>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoResponder;

#[async_trait]
impl Responder for EchoResponder {
    async fn reply(&self, query: &str) -> String {
        format!("You said: {}", query)
    }
}
