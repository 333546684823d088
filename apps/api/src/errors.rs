use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::identity::IdentityError;
use crate::cms::CmsError;
use crate::llm_client::LlmError;
use crate::pipeline::input::MissingFieldError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("CMS error: {0}")]
    Cms(String),

    #[error("Identity provider error: {0}")]
    Identity(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<MissingFieldError> for AppError {
    fn from(err: MissingFieldError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Llm(err.to_string())
    }
}

impl From<CmsError> for AppError {
    fn from(err: CmsError) -> Self {
        AppError::Cms(err.to_string())
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Rejected(msg) => AppError::Unauthorized(msg),
            other => AppError::Identity(other.to_string()),
        }
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized(msg) => {
                tracing::debug!("Unauthorized request: {msg}");
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Cms(msg) => {
                tracing::error!("CMS error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CMS_ERROR",
                    "A content store error occurred".to_string(),
                )
            }
            AppError::Identity(msg) => {
                tracing::error!("Identity provider error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IDENTITY_ERROR",
                    "Could not verify identity".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_maps_to_bad_request_with_generic_message() {
        let err: AppError = MissingFieldError.into();
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
        assert_eq!(
            message,
            "Missing required field: jobDescription, companyName, or roleTitle"
        );
    }

    #[test]
    fn test_rejected_identity_is_unauthorized() {
        let err: AppError = IdentityError::Rejected("INVALID_ID_TOKEN".to_string()).into();
        assert_eq!(err.parts().0, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_upstream_errors_hide_details() {
        let (status, _, message) = AppError::Cms("token expired".to_string()).parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("token"));
    }
}
