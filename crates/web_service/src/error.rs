use actix_web::{http::header, http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::dto::ValidationErrors;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("Too Many Attempts.")]
    TooManyRequests { retry_after: u64 },
}

#[derive(Serialize)]
struct ValidationErrorBody<'a> {
    message: String,
    errors: &'a ValidationErrors,
}

#[derive(Serialize)]
struct JsonError {
    message: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self {
            AppError::Validation(errors) => builder.json(ValidationErrorBody {
                message: self.to_string(),
                errors,
            }),
            AppError::TooManyRequests { retry_after } => builder
                .insert_header((header::RETRY_AFTER, retry_after.to_string()))
                .json(JsonError {
                    message: self.to_string(),
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_validation_error_body() {
        let mut errors = ValidationErrors::default();
        errors.add("topic", "The topic field is required.");
        errors.add("format", "The selected format is invalid.");

        let response = AppError::Validation(errors).error_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = to_bytes(response.into_body()).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body,
            json!({
                "message": "The topic field is required. (and 1 more error)",
                "errors": {
                    "topic": ["The topic field is required."],
                    "format": ["The selected format is invalid."]
                }
            })
        );
    }

    #[actix_web::test]
    async fn test_too_many_requests_sets_retry_after() {
        let response = AppError::TooManyRequests { retry_after: 42 }.error_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            "42"
        );
    }
}
