//! Structured application error

use super::codes::ErrorCode;
use http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the cross-crate error vocabulary, providing:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages suitable for a notification
/// - Optional structured details (offending fields, limits, ...)
#[derive(Debug, Clone, Error, Serialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::NotFound);
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Resource not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_message() {
        let err = AppError::with_message(ErrorCode::ValidationFailed, "Price is not a number");
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.to_string(), "Price is not a number");
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::new(ErrorCode::RequiredField)
            .with_detail("fields", vec!["title", "price"])
            .with_detail("count", 2);

        let details = err.details.unwrap();
        assert_eq!(details.get("fields").unwrap(), &serde_json::json!(["title", "price"]));
        assert_eq!(details.get("count").unwrap(), 2);
    }

    #[test]
    fn test_app_error_http_status() {
        assert_eq!(
            AppError::with_message(ErrorCode::NotFound, "Category 42 not found").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::with_message(ErrorCode::NetworkError, "connection reset").http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_app_error_serialize() {
        let err = AppError::new(ErrorCode::FileTooLarge);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], 6501);
        assert_eq!(json["message"], "File size should be less than 5MB");
        assert!(json.get("details").is_none());
    }
}
