//! Error handling for the API gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error information
    pub error: ErrorInfo,
    /// Request ID for tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Detailed error information
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error code (string identifier for the error type)
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// API errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Authentication failure; always rendered with the same generic
    /// message so probing clients cannot tell which check failed
    #[error("invalid token")]
    InvalidToken,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{0}")]
    Common(#[from] common::error::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Generate a request ID for tracking errors
        let request_id = Uuid::new_v4().to_string();

        // Log the error with request ID for backend tracing
        tracing::error!("API Error [{}]: {:?}", request_id, &self);

        let (status, code) = match &self {
            ApiError::InvalidToken => (StatusCode::FORBIDDEN, "forbidden"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            ApiError::Common(e) => match e {
                // Client errors (4xx)
                common::error::Error::AccountNotFound(_) => {
                    (StatusCode::NOT_FOUND, "account_not_found")
                }
                common::error::Error::InvalidTransfer(_) => {
                    (StatusCode::BAD_REQUEST, "invalid_transfer")
                }
                common::error::Error::InsufficientFunds(_) => {
                    (StatusCode::BAD_REQUEST, "insufficient_funds")
                }
                common::error::Error::ValidationError(_) => {
                    (StatusCode::BAD_REQUEST, "validation_error")
                }
                common::error::Error::AuthorizationError(_) => {
                    (StatusCode::FORBIDDEN, "authorization_error")
                }
                common::error::Error::InvalidToken(_) | common::error::Error::TokenExpired(_) => {
                    (StatusCode::FORBIDDEN, "forbidden")
                }

                // Server errors (5xx)
                common::error::Error::TransferFailed(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "transfer_failed")
                }
                common::error::Error::StorageTimeout(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "storage_timeout")
                }
                common::error::Error::ConfigurationError(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error")
                }
                common::error::Error::Internal(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
                }
                common::error::Error::Database(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
                }
                common::error::Error::Serialization(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "serialization_error")
                }
            },
        };

        // Token failures never leak which check rejected the request
        let message = match &self {
            ApiError::Common(common::error::Error::InvalidToken(_))
            | ApiError::Common(common::error::Error::TokenExpired(_)) => {
                "invalid token".to_string()
            }
            other => other.to_string(),
        };

        let error_response = ErrorResponse {
            error: ErrorInfo {
                code: code.to_string(),
                message,
            },
            request_id: Some(request_id),
        };

        // Return the response with appropriate status code
        (status, Json(error_response)).into_response()
    }
}
