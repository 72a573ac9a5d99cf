use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rentora_services::CoreError;
use rentora_services::auth::AuthError;
use serde::Serialize;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    /// Proposed stay overlaps existing bookings; carries the blocking ids
    /// so the operator can see what is in the way.
    BookingConflict(Vec<String>),
    Internal(String),
    Validation(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    blocking: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, blocking) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::BookingConflict(blocking) => (
                StatusCode::CONFLICT,
                "date_range_conflict",
                "Requested dates overlap an existing booking".to_string(),
                Some(blocking),
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg, None),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation", msg, None),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            blocking,
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DateRangeConflict { blocking } => {
                ApiError::BookingConflict(blocking.iter().map(|id| id.to_hex()).collect())
            }
            CoreError::NotFound => ApiError::NotFound("Resource not found".to_string()),
            CoreError::Storage(e) => ApiError::Internal(e.to_string()),
            validation @ (CoreError::InvalidTransition { .. }
            | CoreError::BookingNotEligible { .. }
            | CoreError::InvalidValidityWindow
            | CoreError::InvalidStayWindow
            | CoreError::CapacityExceeded { .. }
            | CoreError::PaymentLocked) => ApiError::Validation(validation.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired => ApiError::Unauthorized("Token expired".to_string()),
            AuthError::InvalidToken(msg) => ApiError::Unauthorized(msg),
        }
    }
}
