use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use serde::Serialize;

pub const SERVICE_NAME: &str = "vox-ecclesiae-be";

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
    time: String,
}

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: SERVICE_NAME,
        time: Utc::now().to_rfc3339(),
    })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health);
}
