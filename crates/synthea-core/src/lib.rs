//! # Synthea Core
//!
//! The domain layer of the Synthea chat demo.
//! This crate contains the chat use case and the ports it depends on, with
//! zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::DomainError;
pub use service::{ChatReply, ChatService, ChatServiceConfig};
