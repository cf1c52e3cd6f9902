use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog_core::AppError;
use tracing::error;

mod types;

use types::{ErrorDetail, ErrorResponse};

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::Validation(_) | AppError::InvalidFields(_) => {
                (StatusCode::BAD_REQUEST, "Validation failed")
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found"),
            AppError::AlreadyDeleted(_) => (StatusCode::CONFLICT, "Already deleted"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "Permission denied"),
            AppError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "Service unavailable"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }

        let detail = match self.0 {
            AppError::InvalidFields(fields) => ErrorDetail::Fields(fields.as_map().clone()),
            AppError::Validation(detail)
            | AppError::NotFound(detail)
            | AppError::AlreadyDeleted(detail)
            | AppError::Unauthorized(detail)
            | AppError::Forbidden(detail)
            | AppError::Unavailable(detail)
            | AppError::Internal(detail) => ErrorDetail::Message(detail),
        };

        let payload = Json(ErrorResponse::new(status.as_u16(), message, detail));
        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
