//! Error handling - maps failures to `{ "error": ... }` responses.

use std::fmt;
use std::time::Duration;

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use synthea_core::DomainError;
use synthea_core::error::RateLimitExceeded;
use synthea_shared::ErrorResponse;

pub const METHOD_NOT_ALLOWED: &str = "Method Not Allowed";

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    MethodNotAllowed,
    RateLimited(RateLimitExceeded),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::MethodNotAllowed => write!(f, "{}", METHOD_NOT_ALLOWED),
            AppError::RateLimited(exceeded) => write!(f, "Rate limited: {}", exceeded),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());

        match self {
            AppError::BadRequest(detail) => builder.json(ErrorResponse::new(detail)),
            AppError::MethodNotAllowed => builder
                .insert_header((header::ALLOW, "POST"))
                .content_type(ContentType::plaintext())
                .body(METHOD_NOT_ALLOWED),
            AppError::RateLimited(exceeded) => builder
                .insert_header(("X-RateLimit-Remaining", "0"))
                .insert_header((
                    header::RETRY_AFTER,
                    retry_after_secs(exceeded.retry_after).to_string(),
                ))
                .json(ErrorResponse::new(exceeded.to_string())),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                builder.json(ErrorResponse::internal_error())
            }
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::RateLimited(exceeded) => AppError::RateLimited(exceeded),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Whole seconds, rounded up, so clients never retry early.
pub fn retry_after_secs(wait: Duration) -> u64 {
    wait.as_millis().div_ceil(1000) as u64
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
