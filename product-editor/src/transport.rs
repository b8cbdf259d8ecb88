//! Collaborator traits consumed by the editor
//!
//! The editor never talks HTTP itself. Each outside call goes through one
//! of these traits; [`CatalogClient`] implements all of the async ones.

use async_trait::async_trait;
use catalog_client::{CatalogClient, ClientResult};
use parking_lot::Mutex;
use serde_json::Value;
use shared::models::{Category, DescriptionRequest, ProductPayload, ProgressFn, UploadReceipt};
use std::sync::Arc;

use crate::upload::MediaFile;

/// Read-only source of the category tree
#[async_trait]
pub trait CategorySource: Send + Sync {
    async fn fetch_categories(&self) -> ClientResult<Vec<Category>>;
}

/// Sends one file to the media host
#[async_trait]
pub trait UploadTransport: Send + Sync {
    /// Upload `file`, calling `progress` with percentages as bytes go out
    async fn upload(&self, file: &MediaFile, progress: ProgressFn) -> ClientResult<UploadReceipt>;
}

/// Text generation for product descriptions
#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    async fn generate(&self, request: &DescriptionRequest) -> ClientResult<String>;
}

/// Product persistence
#[async_trait]
pub trait ProductMutations: Send + Sync {
    async fn create_product(&self, payload: &ProductPayload) -> ClientResult<Option<Value>>;

    async fn update_product(
        &self,
        id: &str,
        payload: &ProductPayload,
    ) -> ClientResult<Option<Value>>;
}

/// Route changes requested by the editor
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

// ========== HTTP implementations ==========

#[async_trait]
impl CategorySource for CatalogClient {
    async fn fetch_categories(&self) -> ClientResult<Vec<Category>> {
        CatalogClient::fetch_categories(self).await
    }
}

#[async_trait]
impl UploadTransport for CatalogClient {
    async fn upload(&self, file: &MediaFile, progress: ProgressFn) -> ClientResult<UploadReceipt> {
        self.upload_media(&file.name, &file.content_type, file.data.clone(), progress)
            .await
    }
}

#[async_trait]
impl DescriptionGenerator for CatalogClient {
    async fn generate(&self, request: &DescriptionRequest) -> ClientResult<String> {
        self.generate_description(request).await
    }
}

#[async_trait]
impl ProductMutations for CatalogClient {
    async fn create_product(&self, payload: &ProductPayload) -> ClientResult<Option<Value>> {
        CatalogClient::create_product(self, payload).await
    }

    async fn update_product(
        &self,
        id: &str,
        payload: &ProductPayload,
    ) -> ClientResult<Option<Value>> {
        CatalogClient::update_product(self, id, payload).await
    }
}

/// Navigator that only logs and remembers the requested routes
#[derive(Debug, Default)]
pub struct LogNavigator {
    visited: Mutex<Vec<String>>,
}

impl LogNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.visited.lock().last().cloned()
    }
}

impl Navigator for LogNavigator {
    fn navigate(&self, route: &str) {
        tracing::info!(route = %route, "Navigate");
        self.visited.lock().push(route.to_string());
    }
}

/// Every collaborator the editor needs
#[derive(Clone)]
pub struct EditorServices {
    pub categories: Arc<dyn CategorySource>,
    pub uploader: Arc<dyn UploadTransport>,
    pub generator: Arc<dyn DescriptionGenerator>,
    pub products: Arc<dyn ProductMutations>,
    pub navigator: Arc<dyn Navigator>,
}

impl EditorServices {
    /// Use one HTTP client for every remote call
    pub fn from_client(client: CatalogClient, navigator: Arc<dyn Navigator>) -> Self {
        let client = Arc::new(client);
        Self {
            categories: client.clone(),
            uploader: client.clone(),
            generator: client.clone(),
            products: client,
            navigator,
        }
    }
}

impl std::fmt::Debug for EditorServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorServices").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_client::ClientConfig;

    #[test]
    fn test_log_navigator_records_routes() {
        let nav = LogNavigator::new();
        assert!(nav.last().is_none());
        nav.navigate("/admin/products");
        nav.navigate("/admin/products/p1");
        assert_eq!(nav.visited().len(), 2);
        assert_eq!(nav.last().as_deref(), Some("/admin/products/p1"));
    }

    #[test]
    fn test_services_share_one_client() {
        let client = ClientConfig::default().build_client().unwrap();
        let nav: Arc<dyn Navigator> = Arc::new(LogNavigator::new());
        let services = EditorServices::from_client(client, nav.clone());
        assert!(Arc::ptr_eq(&services.navigator, &nav));
    }
}
