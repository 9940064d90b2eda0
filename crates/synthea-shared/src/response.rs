//! Error response body used by every JSON error of the API.

use serde::{Deserialize, Serialize};

/// `{ "error": "<message>" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    pub fn internal_error() -> Self {
        Self::new("Internal Server Error")
    }
}
