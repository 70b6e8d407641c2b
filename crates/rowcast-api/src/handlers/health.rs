//! Liveness endpoint.

use actix_web::HttpResponse;
use serde_json::json;

/// GET /health - simple liveness check
pub async fn healthcheck() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "rowcast",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
