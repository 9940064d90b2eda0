//! Chat query endpoint.

use actix_web::{HttpResponse, web};

use synthea_shared::{QueryRequest, QueryResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;
use crate::state::AppState;

pub const INVALID_JSON: &str = "Invalid JSON body";

/// POST /api/query
pub async fn submit_query(
    state: web::Data<AppState>,
    request_id: RequestId,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let req = parse_query_request(&body)?;

    tracing::debug!(
        request_id = %request_id.as_str(),
        session_key = ?req.session_key,
        "Received query"
    );

    let reply = state.chat.submit(&req.query, req.session_key).await?;

    Ok(HttpResponse::Ok().json(QueryResponse {
        reply: reply.reply,
        session_key: reply.session_key,
    }))
}

/// Any other method on /api/query
pub async fn method_not_allowed() -> AppResult<HttpResponse> {
    Err(AppError::MethodNotAllowed)
}

/// A blank body or a JSON `null` reads as an empty request.
fn parse_query_request(body: &[u8]) -> Result<QueryRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(QueryRequest::default());
    }

    serde_json::from_slice::<Option<QueryRequest>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| {
            tracing::debug!("Rejected query body: {}", e);
            AppError::BadRequest(INVALID_JSON.to_string())
        })
}
