use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use crate::db::DatabaseError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// No usable caller identity on the request.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Caller is known but may not touch the target.
    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(err) => match err {
                DatabaseError::NotFound => StatusCode::NOT_FOUND,
                DatabaseError::Duplicate => StatusCode::CONFLICT,
                DatabaseError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                DatabaseError::Sqlx(_) | DatabaseError::MigrationError(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match status {
            StatusCode::NOT_FOUND => "Resource not found",
            StatusCode::CONFLICT => "Resource conflict",
            StatusCode::BAD_REQUEST => "Invalid input data",
            StatusCode::UNAUTHORIZED => "Authentication failed",
            StatusCode::FORBIDDEN => "Access denied",
            _ => "An internal server error occurred",
        };

        // Infrastructure faults are logged, not echoed back.
        let details = if status.is_server_error() {
            error!(error = %self, "Request failed");
            error_message.to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "details": details,
            }
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
