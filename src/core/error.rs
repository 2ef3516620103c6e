use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

use crate::shared::types::ApiResponse;

/// PostgreSQL SQLSTATE for unique constraint violations
const PG_UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for foreign key violations
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Field-level validation failures, from DTO validation or service rules
    #[error("Invalid input: {0}")]
    InvalidFields(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AppError {
    /// Field-level messages in `field: message` form, sorted for stable output
    pub fn field_messages(errors: &ValidationErrors) -> Vec<String> {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter()
                    .map(|e| match &e.message {
                        Some(message) => format!("{}: {}", field, message),
                        None => format!("{}: invalid value ({})", field, e.code),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        messages.sort();
        messages
    }
}

/// Build a single-field validation failure.
pub fn field_error(field: &'static str, code: &'static str, message: impl Into<String>) -> AppError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message.into()));

    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    AppError::InvalidFields(errors)
}

/// Convert database error to more specific AppError with user-friendly messages
pub fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unique constraint");
            tracing::warn!("Unique constraint violated: {}", constraint);
            return AppError::Conflict(format!(
                "A record with the same unique value already exists ({})",
                constraint
            ));
        }

        if db_err.code().as_deref() == Some(PG_FOREIGN_KEY_VIOLATION) {
            return AppError::BadRequest("Referenced record does not exist.".to_string());
        }
    }

    tracing::error!("Database error: {:?}", e);
    AppError::Database(e)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    None,
                )
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::InvalidFields(ref errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(Self::field_messages(errors)),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone(), None),
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
