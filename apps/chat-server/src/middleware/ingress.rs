//! Per-client ingress throttle applied to every route.

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header,
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use synthea_core::ports::RateLimiter;
use synthea_shared::ErrorResponse;

use super::error::retry_after_secs;

/// Ingress throttle middleware factory. Without a limiter every request passes.
pub struct IngressThrottle {
    limiter: Option<Arc<dyn RateLimiter>>,
}

impl IngressThrottle {
    pub fn new(limiter: Option<Arc<dyn RateLimiter>>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IngressThrottle
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = IngressThrottleService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IngressThrottleService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct IngressThrottleService<S> {
    service: Rc<S>,
    limiter: Option<Arc<dyn RateLimiter>>,
}

impl<S, B> Service<ServiceRequest> for IngressThrottleService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let Some(limiter) = self.limiter.clone() else {
            return Box::pin(async move { Ok(service.call(req).await?.map_into_left_body()) });
        };

        let key = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();

        Box::pin(async move {
            match limiter.check(&key).await {
                Ok(result) if !result.allowed => {
                    tracing::warn!(client = %key, "Ingress throttle exceeded");

                    let wait = retry_after_secs(result.reset_after);
                    let response = HttpResponse::TooManyRequests()
                        .insert_header(("X-RateLimit-Remaining", "0"))
                        .insert_header((header::RETRY_AFTER, wait.to_string()))
                        .json(ErrorResponse::new(format!(
                            "Too many requests from this client. Try again in {} seconds.",
                            wait
                        )));

                    let (http_req, _payload) = req.into_parts();
                    Ok(ServiceResponse::new(http_req, response).map_into_right_body())
                }
                Ok(_) => Ok(service.call(req).await?.map_into_left_body()),
                Err(e) => {
                    // Fail open
                    tracing::error!("Ingress limiter error: {}", e);
                    Ok(service.call(req).await?.map_into_left_body())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};

    async fn ok() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn test_passes_through_without_limiter() {
        let app = test::init_service(
            App::new()
                .wrap(IngressThrottle::new(None))
                .route("/", web::get().to(ok)),
        )
        .await;

        for _ in 0..50 {
            let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }
    }

    #[cfg(feature = "ingress-throttle")]
    #[actix_web::test]
    async fn test_rejects_client_over_quota() {
        use synthea_infra::{GcraRateLimiter, IngressQuota};

        let limiter: Arc<dyn RateLimiter> =
            Arc::new(GcraRateLimiter::new(IngressQuota { per_minute: 2 }).unwrap());
        let app = test::init_service(
            App::new()
                .wrap(IngressThrottle::new(Some(limiter)))
                .route("/", web::get().to(ok)),
        )
        .await;

        let request = || {
            test::TestRequest::get()
                .uri("/")
                .insert_header(("X-Forwarded-For", "203.0.113.7"))
                .to_request()
        };

        assert_eq!(test::call_service(&app, request()).await.status(), StatusCode::OK);
        assert_eq!(test::call_service(&app, request()).await.status(), StatusCode::OK);

        let resp = test::call_service(&app, request()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(resp.headers().get("X-RateLimit-Remaining").unwrap(), "0");
        assert!(resp.headers().contains_key(header::RETRY_AFTER));
    }
}
