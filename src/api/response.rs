//! Response types for the bakery back-office API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use uuid::Uuid;

use crate::error::PosError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    /// Maps a body that could not be read as the expected JSON.
    pub fn from_rejection(correlation_id: Uuid, rejection: JsonRejection) -> Self {
        let error = match rejection {
            JsonRejection::JsonDataError(err) => {
                // The body text carries serde's detailed message.
                let body_text = err.body_text();
                warn!(
                    correlation_id = %correlation_id,
                    error = %body_text,
                    "JSON data error"
                );
                if body_text.contains("missing field") || body_text.contains("unknown variant") {
                    ApiError::validation_error(body_text)
                } else {
                    ApiError::malformed_json(body_text)
                }
            }
            JsonRejection::JsonSyntaxError(err) => {
                warn!(
                    correlation_id = %correlation_id,
                    error = %err,
                    "JSON syntax error"
                );
                ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
            }
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
            }
            _ => ApiError::malformed_json("Failed to parse request body"),
        };
        Self::bad_request(error)
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<PosError> for ApiErrorResponse {
    fn from(err: PosError) -> Self {
        let message = err.to_string();
        let conflict = |code: &str| ApiErrorResponse::bad_request(ApiError::new(code, &message));

        match &err {
            PosError::AlreadyClockedIn { .. } => conflict("ALREADY_CLOCKED_IN"),
            PosError::NotClockedIn { .. } => conflict("NOT_CLOCKED_IN"),
            PosError::BreakAlreadyActive { .. } => conflict("BREAK_ALREADY_ACTIVE"),
            PosError::NoActiveBreak { .. } => conflict("NO_ACTIVE_BREAK"),
            PosError::MealAlreadyTaken { .. } => conflict("MEAL_ALREADY_TAKEN"),
            PosError::NothingToResumeFrom { .. } => conflict("NOTHING_TO_RESUME"),
            PosError::RegisterAlreadyOpen => conflict("REGISTER_ALREADY_OPEN"),
            PosError::NoOpenRegister => conflict("NO_OPEN_REGISTER"),
            PosError::InsufficientStock { .. } => conflict("INSUFFICIENT_STOCK"),
            PosError::Validation { field, .. } => ApiErrorResponse::bad_request(
                ApiError::with_details("VALIDATION_ERROR", &message, field.clone()),
            ),
            PosError::NotFound { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("NOT_FOUND", message),
            },
            PosError::Unauthenticated => ApiErrorResponse {
                status: StatusCode::UNAUTHORIZED,
                error: ApiError::new("UNAUTHENTICATED", message),
            },
            PosError::Forbidden { .. } => ApiErrorResponse {
                status: StatusCode::FORBIDDEN,
                error: ApiError::new("FORBIDDEN", message),
            },
            PosError::ConfigNotFound { .. }
            | PosError::ConfigParseError { .. }
            | PosError::Store { .. } => {
                error!(error = %message, "Internal failure");
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::new("INTERNAL_ERROR", "Internal server error"),
                }
            }
        }
    }
}
