use actix_web::{post, web, HttpRequest, HttpResponse};
use serde_json::Value;

use crate::{
    dto::validate_prepack_request,
    error::{AppError, Result},
    middleware::{extract_trace_id, RateLimit},
    server::AppState,
};

/// Generate a pre-production pack for an episode brief.
///
/// Always answers 200 once the brief validates; AI problems only show up in
/// the envelope's `ai` block.
#[post("/prepack", wrap = "RateLimit")]
pub async fn generate_prepack(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let trace_id = extract_trace_id(&req).unwrap_or_default();

    // Non-JSON bodies validate like an empty object.
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let input = validate_prepack_request(&payload).map_err(|errors| {
        tracing::info!(trace_id = %trace_id, errors = errors.len(), "Prepack brief rejected");
        AppError::Validation(errors)
    })?;

    let envelope = state.generator.generate(input).await;
    tracing::info!(
        trace_id = %trace_id,
        version = ?envelope.version,
        ai_used = envelope.ai.used,
        "Prepack generated"
    );

    Ok(HttpResponse::Ok().json(envelope))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(generate_prepack);
}
