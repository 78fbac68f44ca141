//! Unified application error types for orgdal.
//!
//! Persistence handles, configuration loading and the data-access
//! operations all report failures as [`AppError`]. Callers only ever need
//! [`AppError::status_code`]: `404` when the requested resource does not
//! exist, `500` for everything else.

use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP-style status code for a missing resource.
pub const STATUS_NOT_FOUND: u16 = 404;
/// HTTP-style status code for any unexpected failure.
pub const STATUS_INTERNAL: u16 = 500;

/// Error kind categorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The requested resource, or every resource matching a filter, was not found.
    NotFound,
    /// An unexpected failure or a malformed result from a persistence handle.
    Internal,
    /// A database driver error.
    Database,
    /// Input validation failed (e.g. an unknown filter column).
    Validation,
    /// A configuration error occurred.
    Configuration,
}

impl ErrorKind {
    /// Status code reported for this kind.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound => STATUS_NOT_FOUND,
            _ => STATUS_INTERNAL,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Database => write!(f, "DATABASE"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
        }
    }
}

/// The unified application error used throughout orgdal.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Status code carried by this error.
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    /// Whether this error reports a missing resource.
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    /// The `{statusCode: N}` body for this error.
    pub fn status_body(&self) -> StatusBody {
        StatusBody {
            status_code: self.status_code(),
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

/// Minimal failure value: just the status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBody {
    /// `404` or `500`.
    pub status_code: u16,
}

/// JSON error body returned to HTTP callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Status code, duplicated in the body for clients that only see JSON.
    pub status_code: u16,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let error_code = if self.is_not_found() {
            "NOT_FOUND"
        } else {
            tracing::error!(kind = %self.kind, error = %self.message, "Internal server error");
            "INTERNAL_ERROR"
        };

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message: self.message.clone(),
            status_code: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::not_found("missing").status_code(), 404);
        assert_eq!(AppError::internal("boom").status_code(), 500);
        assert_eq!(AppError::database("driver").status_code(), 500);
        assert_eq!(AppError::validation("column").status_code(), 500);
        assert_eq!(AppError::new(ErrorKind::Configuration, "file").status_code(), 500);
    }

    #[test]
    fn test_status_body_serializes_camel_case() {
        let body = AppError::not_found("missing").status_body();
        let json = serde_json::to_value(body).expect("serialize");
        assert_eq!(json, serde_json::json!({ "statusCode": 404 }));
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::other("disk");
        let err = AppError::with_source(ErrorKind::Database, "write failed", io);
        assert!(std::error::Error::source(&err).is_some());
        let cloned = err.clone();
        assert_eq!(cloned.kind, ErrorKind::Database);
        assert!(cloned.source.is_none());
    }

    #[test]
    fn test_display() {
        let err = AppError::not_found("Organization 1 not found");
        assert_eq!(err.to_string(), "NOT_FOUND: Organization 1 not found");
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::not_found("missing").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::database("down").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
