//! Single-page front end.

use actix_web::HttpResponse;
use actix_web::http::header::ContentType;

static INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET /
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(INDEX_HTML)
}
