//! API Response types
//!
//! The catalog API wraps every response body in the same envelope:
//! ```json
//! {
//!     "status": "success",
//!     "message": "Product created",
//!     "payload": { ... }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Status value the API uses for successful responses
pub const STATUS_SUCCESS: &str = "success";

/// Status value the API uses for failed responses
pub const STATUS_ERROR: &str = "error";

/// Unified API response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// `"success"` or `"error"`
    pub status: String,
    /// Human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response data (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Create a successful envelope
    pub fn success(payload: T) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: None,
            payload: Some(payload),
        }
    }

    /// Create an error envelope
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            message: Some(message.into()),
            payload: None,
        }
    }

    /// Add a message to the envelope
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Whether the status indicates success
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case(STATUS_SUCCESS)
    }

    /// Message to surface when the envelope is not successful
    pub fn failure_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| format!("request finished with status '{}'", self.status))
    }
}
