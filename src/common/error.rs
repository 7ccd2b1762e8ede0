// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Application-wide error type. Every action failure maps to exactly one of
// these; nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    // Unknown username and wrong password are deliberately the same variant,
    // so the response cannot be used to enumerate users.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token")]
    InvalidToken,

    #[error("clinic outside the caller's scope")]
    ClinicScopeDenied,

    #[error("a concrete clinic is required")]
    ClinicRequired,

    #[error("expiry date is in the past")]
    ExpiryDateInPast,

    #[error("transaction quantity must be positive")]
    NonPositiveQuantity,

    #[error("medicine not found")]
    MedicineNotFound,

    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i64, available: i64 },

    #[error("database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("internal server error")]
    InternalServerError(#[from] anyhow::Error),

    #[error("bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Return all the field-level validation details.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid username or password.".to_string(),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Authentication token is missing or invalid.".to_string(),
            ),
            AppError::ClinicScopeDenied => (
                StatusCode::FORBIDDEN,
                "You are not authorized for that clinic.".to_string(),
            ),
            AppError::ClinicRequired => (
                StatusCode::BAD_REQUEST,
                "A concrete clinic must be selected for this action.".to_string(),
            ),
            AppError::ExpiryDateInPast => (
                StatusCode::BAD_REQUEST,
                "Expiry date cannot be before today.".to_string(),
            ),
            AppError::NonPositiveQuantity => (
                StatusCode::BAD_REQUEST,
                "Quantity must be greater than zero.".to_string(),
            ),
            AppError::MedicineNotFound => {
                (StatusCode::NOT_FOUND, "Medicine not found.".to_string())
            }
            AppError::InsufficientStock {
                requested,
                available,
            } => (
                StatusCode::BAD_REQUEST,
                format!("Cannot issue {requested}: only {available} in stock."),
            ),
            // Storage problems are retryable: nothing was committed.
            AppError::DatabaseError(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Storage is temporarily unavailable. Please retry.".to_string(),
                )
            }
            ref e => {
                tracing::error!("Internal server error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
