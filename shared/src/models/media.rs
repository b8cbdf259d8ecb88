//! Uploaded media model
//!
//! The upload endpoint answers with either a single uploaded asset or a list
//! of them. [`UploadResponse::into_receipt`] collapses both shapes into one
//! [`UploadReceipt`] right at the transport boundary.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::response::STATUS_SUCCESS;

/// Multipart field the upload endpoint reads files from
pub const UPLOAD_FIELD: &str = "images";

/// Upload progress callback, called with a percentage in `0..=100`
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// One uploaded asset as reported by the media host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedMedia {
    pub secure_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
}

/// Wire payload: list or single object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UploadPayload {
    Many(Vec<UploadedMedia>),
    One(UploadedMedia),
}

/// Raw upload response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<UploadPayload>,
}

impl UploadResponse {
    /// Normalize into the canonical receipt
    pub fn into_receipt(self) -> UploadReceipt {
        let status = if self.status.eq_ignore_ascii_case(STATUS_SUCCESS) {
            UploadStatus::Success
        } else {
            UploadStatus::Failed(self.message.unwrap_or(self.status))
        };
        let references = match self.payload {
            Some(UploadPayload::Many(items)) => items.into_iter().map(|m| m.secure_url).collect(),
            Some(UploadPayload::One(item)) => vec![item.secure_url],
            None => Vec::new(),
        };
        UploadReceipt { status, references }
    }
}

/// Upload outcome reported by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Success,
    /// Non-success status, with the server's message or raw status
    Failed(String),
}

/// Canonical upload result: status plus secure references in server order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub status: UploadStatus,
    pub references: Vec<String>,
}

impl UploadReceipt {
    pub fn success(references: Vec<String>) -> Self {
        Self {
            status: UploadStatus::Success,
            references,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: UploadStatus::Failed(reason.into()),
            references: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, UploadStatus::Success)
    }

    /// Reference to attach: the first one reported
    pub fn primary_reference(&self) -> Option<&str> {
        self.references.first().map(String::as_str)
    }
}
