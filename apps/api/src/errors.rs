use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::vendor::VendorError;

/// Application-level error type.
///
/// AI and user-data handlers turn it into a `{success:false, message}` envelope
/// (see `envelope`); everything outside them (auth rejection, extractor
/// failures) goes through `IntoResponse` with a real status code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    LimitReached(String),

    #[error("Unauthenticated")]
    Unauthorized,

    #[error(transparent)]
    Identity(AuthError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Vendor(#[from] VendorError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        if e.is_unauthenticated() {
            AppError::Unauthorized
        } else {
            AppError::Identity(e)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::LimitReached(msg) => {
                (StatusCode::PAYMENT_REQUIRED, "LIMIT_REACHED", msg.clone())
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Identity(e) => {
                tracing::error!("Identity provider error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "IDENTITY_ERROR",
                    "Could not load account details".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Vendor(e) => {
                tracing::error!("Vendor error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "VENDOR_ERROR",
                    "An upstream AI service failed".to_string(),
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
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
