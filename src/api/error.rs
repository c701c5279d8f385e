//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::events::{EventError, StoreError};
use crate::fleet::FleetError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Fleet service call failed
    #[error(transparent)]
    Fleet(#[from] FleetError),

    /// Event log error
    #[error("Event log error: {0}")]
    Event(#[from] EventError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, String) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR".into()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND".into()),
            ApiError::Fleet(e) => fleet_status(e),
            ApiError::Event(EventError::Store(StoreError::QuotaExceeded { .. })) => {
                (StatusCode::INSUFFICIENT_STORAGE, "EVENT_QUOTA_EXCEEDED".into())
            }
            ApiError::Event(EventError::Corrupt(_)) => {
                (StatusCode::CONFLICT, "EVENT_LOG_CORRUPT".into())
            }
            ApiError::Event(_) => (StatusCode::INTERNAL_SERVER_ERROR, "EVENT_STORE_ERROR".into()),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR".into()),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR".into()),
        }
    }
}

/// Client errors from the fleet service pass through; everything else is a
/// bad gateway
fn fleet_status(error: &FleetError) -> (StatusCode, String) {
    match error {
        FleetError::Api { status, code, .. } if (400..500).contains(status) => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST);
            let code = code.clone().unwrap_or_else(|| "FLEET_REJECTED".to_string());
            (status, code)
        }
        FleetError::Api { .. } => (StatusCode::BAD_GATEWAY, "FLEET_ERROR".into()),
        FleetError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "FLEET_TIMEOUT".into()),
        FleetError::Unavailable(_) | FleetError::Request(_) => {
            (StatusCode::BAD_GATEWAY, "FLEET_UNAVAILABLE".into())
        }
        FleetError::Decode(_) => (StatusCode::BAD_GATEWAY, "FLEET_BAD_RESPONSE".into()),
        FleetError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "FLEET_CONFIG".into()),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "API error occurred"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
