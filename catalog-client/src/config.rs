//! Client configuration

use crate::{CatalogClient, ClientResult};

/// Default chunk size used to stream upload bodies (64 KiB)
pub const DEFAULT_UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Client configuration for connecting to the catalog API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8000")
    pub base_url: String,

    /// JWT token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Size of the chunks an upload body is streamed in; progress is
    /// reported once per chunk
    pub upload_chunk_size: usize,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            upload_chunk_size: DEFAULT_UPLOAD_CHUNK_SIZE,
        }
    }

    /// Set the JWT token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the upload chunk size (clamped to at least one byte)
    pub fn with_upload_chunk_size(mut self, bytes: usize) -> Self {
        self.upload_chunk_size = bytes.max(1);
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_client(&self) -> ClientResult<CatalogClient> {
        CatalogClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}
