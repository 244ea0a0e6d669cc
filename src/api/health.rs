use actix_web::rt::time::timeout;
use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;
use tracing::warn;

use crate::config::Config;
use crate::store::AttendanceStore;

#[get("/")]
pub async fn index() -> impl Responder {
    "Attendance API"
}

/// Liveness plus one store round-trip
#[utoipa::path(
    responses(
        (status = 200, description = "Service and store reachable", body = Object, example = json!({
            "status": "ok"
        })),
        (status = 503, description = "Store unreachable", body = Object, example = json!({
            "status": "unavailable"
        }))
    ),
    tag = "Health"
)]
#[get("/health")]
pub async fn health(
    store: web::Data<dyn AttendanceStore>,
    config: web::Data<Config>,
) -> impl Responder {
    match timeout(config.request_timeout, store.ping()).await {
        Ok(Ok(())) => HttpResponse::Ok().json(json!({ "status": "ok" })),
        Ok(Err(e)) => {
            warn!(error = %e, "Health check failed");
            HttpResponse::ServiceUnavailable().json(json!({ "status": "unavailable" }))
        }
        Err(_) => {
            warn!("Health check timed out");
            HttpResponse::ServiceUnavailable().json(json!({ "status": "unavailable" }))
        }
    }
}
