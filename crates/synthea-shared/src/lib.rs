//! # Synthea Shared
//!
//! Wire types shared between the chat server and its front end.

pub mod dto;
pub mod response;

pub use dto::{QueryRequest, QueryResponse};
pub use response::ErrorResponse;
