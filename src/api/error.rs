//! Error responses.
//!
//! Every failure leaves the service as an [`ErrorBody`] envelope with a
//! machine-readable `error_code`. Domain errors convert into [`ApiError`]
//! so handlers can use `?`.

use crate::estimation::{EstimationError, OracleError};
use crate::sampling::SamplingError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Message returned for internal failures. Details go to the log only.
pub const INTERNAL_MESSAGE: &str = "an unexpected error occurred";

/// Error envelope as serialized on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable code, e.g. `UNKNOWN_MODE`.
    pub error_code: String,
    /// Human-readable message.
    pub message: String,
    /// Structured context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Request correlation id, stamped by the request middleware.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

/// An error ready to be turned into an HTTP response.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    error_code: &'static str,
    message: String,
    details: Option<Value>,
}

impl ApiError {
    /// Creates an error with an explicit status and code.
    pub fn new(status: StatusCode, error_code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error_code,
            message: message.into(),
            details: None,
        }
    }

    /// 404 `NOT_FOUND`.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    /// 400 `BAD_REQUEST`.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    /// 401 `UNAUTHORIZED`.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    /// 403 `FORBIDDEN`.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", message)
    }

    /// 422 `ESTIMATION_FAILED`.
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "ESTIMATION_FAILED", message)
    }

    /// 500 `INTERNAL_SERVER_ERROR`. `detail` is logged, never returned.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "Internal error");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_SERVER_ERROR",
            INTERNAL_MESSAGE,
        )
    }

    /// Envelope for an error status produced outside the handlers, such as
    /// axum's own 405 for a known path with the wrong method.
    pub fn from_status(status: StatusCode) -> Self {
        let error_code = match status {
            StatusCode::BAD_REQUEST => "BAD_REQUEST",
            StatusCode::UNAUTHORIZED => "UNAUTHORIZED",
            StatusCode::FORBIDDEN => "FORBIDDEN",
            StatusCode::NOT_FOUND => "NOT_FOUND",
            StatusCode::METHOD_NOT_ALLOWED => "METHOD_NOT_ALLOWED",
            StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
            StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
            s if s.is_server_error() => "INTERNAL_SERVER_ERROR",
            _ => "HTTP_ERROR",
        };
        let message = if status.is_server_error() {
            INTERNAL_MESSAGE.to_string()
        } else {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_ascii_lowercase()
        };
        Self::new(status, error_code, message)
    }

    /// Replaces the error code.
    pub fn with_code(mut self, error_code: &'static str) -> Self {
        self.error_code = error_code;
        self
    }

    /// Attaches structured details.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Error code.
    pub fn error_code(&self) -> &'static str {
        self.error_code
    }

    /// Wire envelope without correlation id.
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error_code: self.error_code.to_string(),
            message: self.message.clone(),
            details: self.details.clone(),
            correlation_id: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(code = self.error_code, message = %self.message, "Request failed");
        } else {
            tracing::warn!(code = self.error_code, message = %self.message, "Request rejected");
        }

        let body = self.body();
        let mut response = (self.status, Json(body.clone())).into_response();
        // Picked up by the request middleware to add the correlation id.
        response.extensions_mut().insert(body);
        response
    }
}

impl From<EstimationError> for ApiError {
    fn from(err: EstimationError) -> Self {
        let message = err.to_string();
        match err {
            EstimationError::UnknownMode(mode) => ApiError::bad_request(message)
                .with_code("UNKNOWN_MODE")
                .with_details(json!({ "mode": mode, "supported": ["samples", "probs"] })),
            EstimationError::UnsupportedApproach {
                name,
                measure,
                supported,
            } => ApiError::bad_request(message)
                .with_code("UNSUPPORTED_APPROACH")
                .with_details(json!({
                    "approach": name,
                    "measure": measure,
                    "supported": supported,
                })),
            EstimationError::MissingInput { field, .. } => ApiError::bad_request(message)
                .with_code("MISSING_INPUT")
                .with_details(json!({ "field": field })),
            EstimationError::LengthMismatch { x_len, y_len } => ApiError::bad_request(message)
                .with_code("LENGTH_MISMATCH")
                .with_details(json!({ "x_len": x_len, "y_len": y_len })),
            EstimationError::Oracle(err) => err.into(),
        }
    }
}

impl From<OracleError> for ApiError {
    fn from(err: OracleError) -> Self {
        let message = err.to_string();
        match err {
            OracleError::InvalidParameter { name, .. } => ApiError::bad_request(message)
                .with_code("INVALID_PARAMETER")
                .with_details(json!({ "parameter": name })),
            OracleError::InsufficientSamples { approach, need, got } => {
                ApiError::unprocessable(message)
                    .with_details(json!({ "approach": approach, "need": need, "got": got }))
            }
            OracleError::Undefined { approach, .. } => {
                ApiError::unprocessable(message).with_details(json!({ "approach": approach }))
            }
            OracleError::Internal(detail) => ApiError::internal(detail),
        }
    }
}

impl From<SamplingError> for ApiError {
    fn from(err: SamplingError) -> Self {
        ApiError::bad_request(err.to_string()).with_code("INVALID_PARAMETER")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::internal(format!("estimation task failed: {err}"))
    }
}
