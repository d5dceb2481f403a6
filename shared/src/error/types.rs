//! Error types and the JSON error body

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the error type every HTTP handler returns, providing:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Field-level violations for validation failures
/// - Optional structured details for debugging
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Field-level validation failures (empty unless `ValidationFailed`)
    pub violations: Vec<String>,
    /// Optional additional details (resource, key, ...)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            violations: Vec::new(),
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            violations: Vec::new(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error with a single message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::validation_errors(vec![msg.into()])
    }

    /// Create a validation error carrying one message per failed field
    pub fn validation_errors(violations: Vec<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: ErrorCode::ValidationFailed.message().to_string(),
            violations,
            details: None,
        }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create an order not found error
    ///
    /// `label` names the lookup key in the message ("number", "unique ID").
    pub fn order_not_found(label: &str, key: &str) -> Self {
        Self::with_message(
            ErrorCode::OrderNotFound,
            format!("Order with {label} {key} not found"),
        )
        .with_detail("key", key)
    }

    /// Create an already exists error
    pub fn already_exists(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::AlreadyExists, format!("{} already exists", r))
            .with_detail("resource", r)
    }

    /// Create a duplicate order number error
    pub fn order_number_exists(order_number: &str) -> Self {
        Self::with_message(
            ErrorCode::OrderNumberExists,
            format!("Order with number {order_number} already exists"),
        )
        .with_detail("order_number", order_number)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }
}

/// `message` is a plain string, or a list of field failures for validation errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    Text(String),
    List(Vec<String>),
}

/// JSON body returned for every failed request
///
/// ```json
/// {
///   "statusCode": 409,
///   "code": 4002,
///   "error": "Conflict",
///   "message": "Order with number ORD-1 already exists",
///   "timestamp": "2026-01-01T00:00:00.000Z"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// HTTP status code
    pub status_code: u16,
    /// Application error code
    pub code: ErrorCode,
    /// HTTP reason phrase ("Bad Request", "Not Found", ...)
    pub error: String,
    /// Human-readable message or list of validation failures
    pub message: ErrorMessage,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
    /// Request path and query that failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Request method that failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Time the error was produced (RFC 3339, UTC)
    pub timestamp: String,
}

impl ErrorResponse {
    /// Create an error response from an AppError
    pub fn from_error(err: &AppError) -> Self {
        let status = err.http_status();
        let message = if err.violations.is_empty() {
            ErrorMessage::Text(err.message.clone())
        } else {
            ErrorMessage::List(err.violations.clone())
        };
        Self {
            status_code: status.as_u16(),
            code: err.code,
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
            details: err.details.clone(),
            path: None,
            method: None,
            timestamp: crate::util::now_rfc3339(),
        }
    }

    /// Attach the request that produced the error
    pub fn for_request(mut self, method: &http::Method, uri: &http::Uri) -> Self {
        self.method = Some(method.to_string());
        self.path = Some(
            uri.path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| uri.path().to_string()),
        );
        self
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ErrorResponse::from_error(&self);

        if self.code.is_server_fault() {
            tracing::error!(code = %self.code, message = %self.message, "Server fault");
        }

        // Kept on the response so request-aware middleware can rebuild the body
        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(self);
        response
    }
}
