use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use prepack_core::PrepackGenerator;
use tracing::{error, info};
use vox_llm::OpenAIConfig;

use crate::config::ServerConfig;
use crate::controllers::{health_controller, prepack_controller};
use crate::middleware::{RateLimiter, TracingMiddleware};

pub struct AppState {
    pub generator: PrepackGenerator,
}

const DEFAULT_WORKER_COUNT: usize = 10;

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(health_controller::config)
            .configure(prepack_controller::config),
    );
}

/// Configured origins, any method, any header.
pub fn build_cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
}

pub async fn run(server_config: ServerConfig, openai_config: OpenAIConfig) -> Result<(), String> {
    info!("Starting web service...");

    if !openai_config.ai_available() {
        info!("OpenAI disabled or key missing, serving template packs only");
    }

    let generator = PrepackGenerator::new(openai_config)
        .map_err(|e| format!("Failed to build OpenAI client: {e}"))?;
    let app_state = web::Data::new(AppState { generator });
    let rate_limiter = web::Data::new(RateLimiter::per_minute(server_config.rate_limit_per_minute));
    let allowed_origins = server_config.allowed_origins.clone();
    let bind_address = server_config.bind_address();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(rate_limiter.clone())
            .wrap(build_cors(&allowed_origins))
            .wrap(TracingMiddleware)
            .configure(app_config)
    })
    .workers(DEFAULT_WORKER_COUNT)
    .bind(&bind_address)
    .map_err(|e| format!("Failed to bind server: {e}"))?
    .run();

    info!("Starting web service on http://{bind_address}");

    if let Err(e) = server.await {
        error!("Web server error: {}", e);
        return Err(format!("Web server error: {e}"));
    }

    Ok(())
}
