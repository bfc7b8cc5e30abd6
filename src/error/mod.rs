use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors returned by the HTTP surface.
///
/// Provider failures never show up here: they stop at the notifier.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

/// RUN_MODE=production (or prod) hides internal details from clients
fn is_production() -> bool {
    matches!(
        std::env::var("RUN_MODE").as_deref(),
        Ok("production") | Ok("prod")
    )
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Detail for logs, never masked
    fn detail(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::NotFound(msg) | AppError::Internal(msg) => {
                msg.clone()
            }
        }
    }

    /// Detail for the response body
    fn client_message(&self) -> String {
        match self {
            AppError::Internal(_) if is_production() => "Internal server error".to_string(),
            _ => self.detail(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        if status.is_server_error() {
            tracing::error!(code, status = status.as_u16(), message = %self.detail(), "API error");
        } else {
            tracing::debug!(code, status = status.as_u16(), message = %self.detail(), "Rejected API request");
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.client_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
