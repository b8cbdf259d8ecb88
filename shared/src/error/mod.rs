//! Unified error system for the catalog admin
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCategory, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::FileTooLarge);
//! assert_eq!(err.to_string(), "File size should be less than 5MB");
//!
//! let err = AppError::with_message(ErrorCode::RequiredField, "Missing required field")
//!     .with_detail("field", "title");
//! assert_eq!(err.code.category(), ErrorCategory::General);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::ErrorCode;
pub use types::AppError;
