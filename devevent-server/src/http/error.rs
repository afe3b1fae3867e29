//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::models::{FieldDetail, ValidationError};
use crate::Error;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Field validation failed (400)
    Validation {
        message: String,
        details: Vec<FieldDetail>,
    },

    /// Malformed request (400)
    BadRequest { message: String },

    /// Request body over the route's limit (413)
    PayloadTooLarge { message: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Referenced record does not exist (422)
    Reference { message: String },

    /// Unique constraint violated (409)
    Conflict { message: String },

    /// Internal error (500, logged)
    Internal { message: String, cause: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Map an extractor rejection, keeping 413 for oversized bodies.
    pub fn rejection(status: StatusCode, message: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge { message }
        } else {
            Self::BadRequest { message }
        }
    }

    fn internal(message: &str, cause: impl ToString) -> Self {
        Self::Internal {
            message: message.to_string(),
            cause: cause.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Reference { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Validation { message, details } => json!({
                "error": "validation_error",
                "message": message,
                "details": details
            }),
            Self::BadRequest { message } => json!({
                "error": "bad_request",
                "message": message
            }),
            Self::PayloadTooLarge { message } => json!({
                "error": "payload_too_large",
                "message": message
            }),
            Self::NotFound { resource, id } => json!({
                "error": "not_found",
                "message": format!("{} '{}' not found", resource, id)
            }),
            Self::Reference { message } => json!({
                "error": "reference_error",
                "message": message
            }),
            Self::Conflict { message } => json!({
                "error": "conflict",
                "message": message
            }),
            Self::Internal { message, cause } => {
                tracing::error!(%cause, "{}", message);
                json!({
                    "error": "internal_error",
                    "message": message,
                    "cause": cause
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation {
            message: e.to_string(),
            details: vec![FieldDetail {
                field: e.field(),
                message: e.to_string(),
            }],
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::rejection(e.status(), e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::rejection(e.status(), e.body_text())
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::Validation(errors) => Self::Validation {
                message: "validation failed".to_string(),
                details: errors.details(),
            },
            Error::Reference { .. } => Self::Reference {
                message: "referenced event does not exist".to_string(),
            },
            Error::ReferenceLookup(cause) => Self::Validation {
                message: "error validating event reference".to_string(),
                details: vec![FieldDetail {
                    field: "eventId",
                    message: cause.to_string(),
                }],
            },
            err @ Error::Conflict { .. } => Self::Conflict {
                message: err.to_string(),
            },
            Error::Connect(cause) => Self::internal("database unavailable", cause),
            Error::Store(cause) => Self::internal("database error", cause),
            Error::Upload(cause) => Self::internal("image upload failed", cause),
        }
    }
}
