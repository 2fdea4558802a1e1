use actix_web::{web, HttpResponse, Result};
use crate::models::HealthResponse;

/// 存活探针，不依赖缓存和上游状态
pub async fn health_check() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthResponse::ok()))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
