//! Interaction endpoint error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use super::signature::SignatureError;

/// Transport-level failures. Command failures are replies, not these.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Signature header absent while signatures are required.
    #[error("Missing X-Signature-256 header")]
    MissingSignature,

    /// Signature present but not valid for the body.
    #[error("Invalid interaction signature")]
    InvalidSignature(#[from] SignatureError),

    /// Body could not be read.
    #[error("Failed to read request body")]
    Body,

    /// Interaction payload failed validation.
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Error response body for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::MissingSignature => (StatusCode::UNAUTHORIZED, "MISSING_SIGNATURE"),
            Self::InvalidSignature(_) => (StatusCode::UNAUTHORIZED, "INVALID_SIGNATURE"),
            Self::Body => (StatusCode::BAD_REQUEST, "INVALID_BODY"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        };

        let body = Json(ErrorResponse {
            error: code.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}
