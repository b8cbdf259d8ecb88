//! Editor error types
//!
//! Display strings are the messages shown to the operator; every variant
//! also maps to a [`ErrorCode`] so it can be surfaced as an [`AppError`].

use catalog_client::ClientError;
use shared::error::{AppError, ErrorCategory, ErrorCode};
use thiserror::Error;

/// Submission rejected before anything was dispatched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Required fields that are absent or falsy, in check order
    #[error("All fields required")]
    MissingFields(Vec<String>),

    #[error("Price, stock, and discount price cannot be negative")]
    Negative { field: String },

    #[error("{field} must be a number, got '{value}'")]
    NotANumber { field: String, value: String },

    /// A file is selected but its upload has not attached a thumbnail
    #[error("Please upload the thumbnail first.")]
    ThumbnailNotUploaded,
}

impl ValidationError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::MissingFields(_) => ErrorCode::RequiredField,
            Self::Negative { .. } => ErrorCode::ProductInvalidPrice,
            Self::NotANumber { .. } => ErrorCode::InvalidFormat,
            Self::ThumbnailNotUploaded => ErrorCode::ThumbnailNotUploaded,
        }
    }
}

/// Thumbnail selection or upload failure
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Please select a valid image file")]
    UnsupportedMediaType(String),

    #[error("File size should be less than 5MB")]
    FileTooLarge { size: usize, max: usize },

    #[error("Please select a thumbnail image first")]
    NoFileSelected,

    /// Upload answered with a non-success status
    #[error("Failed to upload thumbnail: {0}")]
    Rejected(String),

    /// Upload succeeded but reported no reference to attach
    #[error("Failed to upload thumbnail: no reference returned")]
    MissingReference,

    #[error("Failed to upload thumbnail. Please try again.")]
    Transport(#[source] ClientError),
}

impl UploadError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedMediaType(_) => ErrorCode::UnsupportedFileFormat,
            Self::FileTooLarge { .. } => ErrorCode::FileTooLarge,
            Self::NoFileSelected => ErrorCode::NoFileProvided,
            Self::Rejected(_) | Self::MissingReference | Self::Transport(_) => {
                ErrorCode::FileStorageFailed
            }
        }
    }
}

/// AI description failure
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Failed to generate AI description")]
    Transport(#[source] ClientError),

    #[error("Failed to generate AI description: empty response")]
    EmptyDescription,
}

impl GenerationError {
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::DescriptionGenerationFailed
    }
}

/// Product editor error
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Failed to load categories")]
    Categories(#[source] ClientError),

    /// Create or update call failed
    #[error("Failed to save product: {0}")]
    Dispatch(#[source] ClientError),

    /// An async result arrived after the draft was replaced
    #[error("Draft was replaced while the operation was running")]
    StaleDraft { started: u64, current: u64 },
}

impl EditorError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Validation(e) => e.error_code(),
            Self::Upload(e) => e.error_code(),
            Self::Generation(e) => e.error_code(),
            Self::Categories(_) => ErrorCode::CategoryLoadFailed,
            Self::Dispatch(e) => e.error_code(),
            Self::StaleDraft { .. } => ErrorCode::InvalidRequest,
        }
    }
}

impl From<EditorError> for AppError {
    fn from(err: EditorError) -> Self {
        let app = AppError::with_message(err.error_code(), err.to_string());
        match err {
            EditorError::Validation(ValidationError::MissingFields(fields)) => {
                app.with_detail("fields", fields)
            }
            EditorError::Validation(ValidationError::Negative { field })
            | EditorError::Validation(ValidationError::NotANumber { field, .. }) => {
                app.with_detail("field", field)
            }
            EditorError::Upload(UploadError::FileTooLarge { size, max }) => app
                .with_detail("size", size as u64)
                .with_detail("max", max as u64),
            _ => app,
        }
    }
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;

/// Classify a command failure for reporting
///
/// Editor, upload and client errors keep their codes; anything else is an
/// internal error carrying its full context chain.
pub fn report(err: anyhow::Error) -> AppError {
    let err = match err.downcast::<EditorError>() {
        Ok(e) => return e.into(),
        Err(err) => err,
    };
    let err = match err.downcast::<UploadError>() {
        Ok(e) => return EditorError::Upload(e).into(),
        Err(err) => err,
    };
    match err.downcast::<ClientError>() {
        Ok(e) => e.into(),
        Err(err) => AppError::with_message(ErrorCode::InternalError, format!("{err:#}")),
    }
}

/// Process exit status for a reported failure
pub fn exit_status(err: &AppError) -> u8 {
    match err.code.category() {
        ErrorCategory::General | ErrorCategory::Product => 2,
        ErrorCategory::Media | ErrorCategory::Assistant => 3,
        ErrorCategory::Auth | ErrorCategory::Permission => 4,
        ErrorCategory::System => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_codes() {
        assert_eq!(
            ValidationError::MissingFields(vec!["title".into()]).error_code(),
            ErrorCode::RequiredField
        );
        assert_eq!(
            ValidationError::Negative { field: "price".into() }.error_code(),
            ErrorCode::ProductInvalidPrice
        );
        assert_eq!(
            ValidationError::ThumbnailNotUploaded.to_string(),
            "Please upload the thumbnail first."
        );
    }

    #[test]
    fn test_upload_codes() {
        let err = UploadError::FileTooLarge { size: 6, max: 5 };
        assert_eq!(err.error_code(), ErrorCode::FileTooLarge);
        assert_eq!(err.to_string(), "File size should be less than 5MB");
        assert_eq!(
            UploadError::NoFileSelected.error_code(),
            ErrorCode::NoFileProvided
        );
        assert_eq!(
            UploadError::Transport(ClientError::Unauthorized).error_code(),
            ErrorCode::FileStorageFailed
        );
    }

    #[test]
    fn test_dispatch_uses_client_code() {
        let err = EditorError::Dispatch(ClientError::NotFound("p1".into()));
        assert_eq!(err.error_code(), ErrorCode::NotFound);
    }

    #[test]
    fn test_into_app_error_keeps_fields() {
        let err: EditorError =
            ValidationError::MissingFields(vec!["title".into(), "price".into()]).into();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::RequiredField);
        assert_eq!(app.message, "All fields required");
        let details = app.details.unwrap();
        assert_eq!(details["fields"], serde_json::json!(["title", "price"]));
    }

    #[test]
    fn test_report_keeps_codes() {
        let app = report(EditorError::from(ValidationError::ThumbnailNotUploaded).into());
        assert_eq!(app.code, ErrorCode::ThumbnailNotUploaded);
        assert_eq!(exit_status(&app), 3);

        let app = report(UploadError::FileTooLarge { size: 9, max: 5 }.into());
        assert_eq!(app.code, ErrorCode::FileTooLarge);
        assert_eq!(app.http_status().as_u16(), 413);
        assert_eq!(app.details.unwrap()["max"], 5);

        let app = report(ClientError::Unauthorized.into());
        assert_eq!(app.code, ErrorCode::NotAuthenticated);
        assert_eq!(exit_status(&app), 4);
    }

    #[test]
    fn test_report_other_errors_as_internal() {
        let err = anyhow::anyhow!("disk gone").context("failed to read draft.json");
        let app = report(err);
        assert_eq!(app.code, ErrorCode::InternalError);
        assert_eq!(app.message, "failed to read draft.json: disk gone");
        assert_eq!(exit_status(&app), 1);

        let missing: EditorError = ValidationError::MissingFields(vec!["title".into()]).into();
        assert_eq!(exit_status(&report(missing.into())), 2);
    }

    #[test]
    fn test_generation_message() {
        let err: EditorError = GenerationError::EmptyDescription.into();
        assert_eq!(err.error_code(), ErrorCode::DescriptionGenerationFailed);
    }
}
