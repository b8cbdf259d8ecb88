//! Unified error codes for the catalog admin
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 60xx-64xx: Product and category errors
//! - 65xx: Media upload errors
//! - 66xx: Description assistant errors
//! - 9xxx: System errors

use serde::Serialize;
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility with the admin frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 6xxx: Product ====================
    ProductInvalidPrice = 6002,
    CategoryLoadFailed = 6104,

    // ==================== 65xx: Media Upload ====================
    FileTooLarge = 6501,
    UnsupportedFileFormat = 6502,
    NoFileProvided = 6504,
    FileStorageFailed = 6509,
    ThumbnailNotUploaded = 6510,

    // ==================== 66xx: Description Assistant ====================
    DescriptionGenerationFailed = 6601,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    NetworkError = 9003,
    TimeoutError = 9004,
    ConfigError = 9005,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "All fields required",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Product
            ErrorCode::ProductInvalidPrice => {
                "Price, stock, and discount price cannot be negative"
            }
            ErrorCode::CategoryLoadFailed => "Failed to load categories",

            // Media
            ErrorCode::FileTooLarge => "File size should be less than 5MB",
            ErrorCode::UnsupportedFileFormat => "Please select a valid image file",
            ErrorCode::NoFileProvided => "Please select a thumbnail image first",
            ErrorCode::FileStorageFailed => "Failed to upload thumbnail. Please try again.",
            ErrorCode::ThumbnailNotUploaded => "Please upload the thumbnail first.",

            // Assistant
            ErrorCode::DescriptionGenerationFailed => "Failed to generate AI description",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
