//! Catalog Client - HTTP client for the catalog admin API
//!
//! Provides network-based calls for the product editor: category tree,
//! media upload with progress, AI description generation and product
//! create/update.

pub mod config;
pub mod error;
pub mod http;
pub mod upload;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::CatalogClient;

// Re-export shared types for convenience
pub use shared::models::{
    Category, DescriptionRequest, ProductPayload, ProgressFn, UploadReceipt, UploadStatus,
};
