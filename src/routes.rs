use crate::{
    api::{attendance, health},
    config::Config,
    error::ApiError,
};
use actix_cors::Cors;
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{Scope, web};

/// Per-peer-IP limiter; `None` when `RATE_PER_MIN` is 0.
fn build_limiter(requests_per_min: u32) -> Option<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    if requests_per_min == 0 {
        return None;
    }
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()?;
    Some(Governor::new(&cfg))
}

fn attendance_scope(config: &Config) -> Scope {
    // Body and path rejections share the `{"error": ...}` shape
    let json_cfg = web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into());
    let path_cfg = web::PathConfig::default().error_handler(|err, _req| {
        ApiError::BadRequest(format!("Invalid path parameter: {err}")).into()
    });

    web::scope(&format!("{}/attendance", config.api_prefix))
        .app_data(json_cfg)
        .app_data(path_cfg)
        // /attendance
        .service(web::resource("").route(web::get().to(attendance::list_attendance)))
        // /attendance/by-employee/{employee_id}
        .service(
            web::resource("/by-employee/{employee_id}")
                .route(web::get().to(attendance::list_by_employee)),
        )
        // /attendance/clock-in
        .service(web::resource("/clock-in").route(web::post().to(attendance::clock_in)))
        // /attendance/clock-out/{employee_id}
        .service(
            web::resource("/clock-out/{employee_id}").route(web::put().to(attendance::clock_out)),
        )
        // /attendance/{id}, last so the literal segments win
        .service(web::resource("/{id}").route(web::get().to(attendance::get_attendance)))
}

/// Any origin, method and header.
pub fn cors() -> Cors {
    Cors::permissive()
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    cfg.service(health::index).service(health::health);

    let scope = attendance_scope(config);
    match build_limiter(config.rate_per_min) {
        Some(limiter) => cfg.service(scope.wrap(limiter)),
        None => cfg.service(scope),
    };
}
