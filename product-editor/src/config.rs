//! Editor and admin binary configuration

use catalog_client::ClientConfig;

use crate::category::DEFAULT_INDENT;

/// Largest accepted thumbnail, in bytes (5 MB)
pub const MAX_THUMBNAIL_BYTES: usize = 5 * 1024 * 1024;

/// Route requested after a successful submission
pub const DEFAULT_LISTING_ROUTE: &str = "/admin/products";

/// When navigation happens relative to the product mutation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NavigationPolicy {
    /// Spawn the mutation and navigate right away; failures are only logged
    AfterDispatch,
    /// Wait for the mutation and navigate only if it succeeded
    #[default]
    AfterConfirmation,
}

/// Thumbnail upload limits
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Maximum file size in bytes (inclusive)
    pub max_bytes: usize,
    /// Keep the selected file after a failed upload so it can be retried
    pub retain_pending_on_failure: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: MAX_THUMBNAIL_BYTES,
            retain_pending_on_failure: true,
        }
    }
}

/// Product editor configuration
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Prefix repeated once per tree level in category labels
    pub indent_unit: String,
    pub upload: UploadConfig,
    pub navigation: NavigationPolicy,
    /// Where to go once a product has been saved
    pub listing_route: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            indent_unit: DEFAULT_INDENT.to_string(),
            upload: UploadConfig::default(),
            navigation: NavigationPolicy::default(),
            listing_route: DEFAULT_LISTING_ROUTE.to_string(),
        }
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent_unit(mut self, indent: impl Into<String>) -> Self {
        self.indent_unit = indent.into();
        self
    }

    pub fn with_max_upload_bytes(mut self, max_bytes: usize) -> Self {
        self.upload.max_bytes = max_bytes;
        self
    }

    pub fn with_retain_pending_on_failure(mut self, retain: bool) -> Self {
        self.upload.retain_pending_on_failure = retain;
        self
    }

    pub fn with_navigation(mut self, policy: NavigationPolicy) -> Self {
        self.navigation = policy;
        self
    }

    pub fn with_listing_route(mut self, route: impl Into<String>) -> Self {
        self.listing_route = route.into();
        self
    }
}

/// Configuration of the `catalog-admin` binary
///
/// Read from the environment (after `.env` is loaded):
/// - `CATALOG_API_URL` (default `http://localhost:8000`)
/// - `CATALOG_API_TOKEN`
/// - `CATALOG_TIMEOUT_SECS` (default 30)
/// - `LOG_LEVEL` (default `info`)
/// - `LOG_DIR` (file logging disabled when unset)
/// - `LOG_JSON` (`true` for JSON console output)
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub log_json: bool,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_url: ClientConfig::default().base_url,
            api_token: None,
            timeout_secs: ClientConfig::default().timeout,
            log_level: "info".to_string(),
            log_dir: None,
            log_json: false,
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            api_url: non_empty("CATALOG_API_URL").unwrap_or(defaults.api_url),
            api_token: non_empty("CATALOG_API_TOKEN"),
            timeout_secs: non_empty("CATALOG_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.timeout_secs),
            log_level: non_empty("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: non_empty("LOG_DIR"),
            log_json: non_empty("LOG_JSON")
                .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
                .unwrap_or(defaults.log_json),
        }
    }

    /// HTTP client configuration derived from this config
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.api_url.clone()).with_timeout(self.timeout_secs);
        match &self.api_token {
            Some(token) => config.with_token(token.clone()),
            None => config,
        }
    }
}
