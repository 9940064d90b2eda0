//! Request ID middleware - correlates log lines and responses per request.

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderMap, HeaderName, HeaderValue},
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use tracing::Instrument;
use uuid::Uuid;

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Reuses a non-empty, visible-ASCII `X-Request-ID` from the caller, or
/// generates a UUID v4.
fn resolve_request_id(headers: &HeaderMap) -> String {
    headers
        .get(&REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Tags every request with an ID. The ID is stored in request extensions
/// for the `RequestId` extractor, recorded on a `request` span that covers
/// the whole handler, and echoed in the `X-Request-ID` response header.
pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestIdService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdService { inner: service }))
    }
}

pub struct RequestIdService<S> {
    inner: S,
}

impl<S, B> Service<ServiceRequest> for RequestIdService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(inner);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let id = resolve_request_id(req.headers());
        req.extensions_mut().insert(RequestId(id.clone()));

        let span = tracing::info_span!("request", request_id = %id);
        let response = span.in_scope(|| self.inner.call(req));

        Box::pin(
            async move {
                let mut res = response.await?;
                // Caller-supplied IDs may not be valid header values.
                if let Ok(value) = HeaderValue::from_str(&id) {
                    res.headers_mut().insert(REQUEST_ID.clone(), value);
                }
                Ok(res)
            }
            .instrument(span),
        )
    }
}

/// The current request's ID, as assigned by `RequestIdMiddleware`.
/// Outside the middleware a fresh ID is generated.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl actix_web::FromRequest for RequestId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let id = req
            .extensions()
            .get::<RequestId>()
            .cloned()
            .unwrap_or_else(|| RequestId(Uuid::new_v4().to_string()));

        ready(Ok(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_id_is_trimmed_and_kept() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID.clone(), HeaderValue::from_static("  trace-42 "));
        assert_eq!(resolve_request_id(&headers), "trace-42");
    }

    #[test]
    fn test_blank_or_missing_id_is_generated() {
        let mut headers = HeaderMap::new();
        assert!(Uuid::parse_str(&resolve_request_id(&headers)).is_ok());

        headers.insert(REQUEST_ID.clone(), HeaderValue::from_static("   "));
        assert!(Uuid::parse_str(&resolve_request_id(&headers)).is_ok());
    }
}
