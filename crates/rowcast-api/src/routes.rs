//! API routes configuration
//!
//! - GET /health - liveness check (root level, no version prefix)
//! - GET /v1/api/healthcheck - liveness check (versioned API path)
//! - GET /v1/api/streams/{shape} - stream a registered shape as JSON

use crate::handlers;
use actix_web::web;

/// Configure all Rowcast HTTP routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::healthcheck)).service(
        web::scope("/v1").service(
            web::scope("/api")
                .service(handlers::stream_shape)
                .route("/healthcheck", web::get().to(handlers::healthcheck)),
        ),
    );
}
