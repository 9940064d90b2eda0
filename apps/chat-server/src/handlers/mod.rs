//! HTTP handlers and route configuration.

mod health;
mod index;
mod query;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index::index)).service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::resource("/query")
                    .route(web::post().to(query::submit_query))
                    .default_service(web::to(query::method_not_allowed)),
            ),
    );
}
