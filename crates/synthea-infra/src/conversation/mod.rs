//! Conversation store implementations.

mod memory;

pub use memory::InMemoryConversationStore;
