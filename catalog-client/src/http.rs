//! HTTP client for the catalog admin API

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::ApiEnvelope;
use shared::models::{
    Category, DescriptionRequest, ProductPayload, ProgressFn, UploadReceipt, UploadResponse,
};

use crate::upload::media_form;
use crate::{ClientConfig, ClientError, ClientResult};

// ========== Endpoints ==========

const CATEGORY_PATH: &str = "api/v1/category";
const UPLOAD_PATH: &str = "api/v1/upload";
const DESCRIPTION_PATH: &str = "api/v1/ai/generate-description";
const PRODUCT_PATH: &str = "api/v1/product";

/// Description endpoint answer
///
/// Older deployments return `{ description }`, newer ones the standard
/// envelope with the text as `payload`.
#[derive(Debug, serde::Deserialize)]
struct DescriptionResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    payload: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// HTTP client for making network requests to the catalog API
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    upload_chunk_size: usize,
}

impl CatalogClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(ClientError::Config("base_url must not be empty".into()));
        }
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            upload_chunk_size: config.upload_chunk_size.max(1),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Build authorization header value
    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth_header() {
            Some(auth) => request.header(reqwest::header::AUTHORIZATION, auth),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorize(self.client.get(self.url(path)));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.authorize(self.client.post(self.url(path)).json(body));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.authorize(self.client.put(self.url(path)).json(body));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            return Err(Self::error_for_status(status, text));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(Into::into)
    }

    /// Map a failed HTTP status (and the body the server sent) to an error
    fn error_for_status(status: StatusCode, text: String) -> ClientError {
        // Try to extract the message from the API envelope
        let message = serde_json::from_str::<ApiEnvelope<Value>>(&text)
            .ok()
            .and_then(|env| env.message)
            .unwrap_or(text);

        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(message)
            }
            _ if status.is_server_error() => ClientError::Internal(message),
            _ => ClientError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Unwrap a successful envelope's payload
    fn into_payload<T>(envelope: ApiEnvelope<T>) -> ClientResult<Option<T>> {
        if !envelope.is_success() {
            return Err(ClientError::Rejected(envelope.failure_message()));
        }
        Ok(envelope.payload)
    }

    // ========== Category API ==========

    /// Fetch the full category tree
    pub async fn fetch_categories(&self) -> ClientResult<Vec<Category>> {
        let envelope: ApiEnvelope<Vec<Category>> = self.get(CATEGORY_PATH).await?;
        let categories = Self::into_payload(envelope)?.unwrap_or_default();
        tracing::debug!(roots = categories.len(), "Fetched category tree");
        Ok(categories)
    }

    // ========== Media API ==========

    /// Upload one file as multipart, reporting progress through `progress`
    ///
    /// A non-success status in the response body is not an error here; it
    /// is returned in the receipt for the caller to decide.
    pub async fn upload_media(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
        progress: ProgressFn,
    ) -> ClientResult<UploadReceipt> {
        let size = data.len();
        let form = media_form(file_name, content_type, data, self.upload_chunk_size, progress)?;
        let request = self.authorize(self.client.post(self.url(UPLOAD_PATH)).multipart(form));

        tracing::debug!(file = %file_name, size, "Uploading media");
        let response = request.send().await?;
        let upload: UploadResponse = Self::handle_response(response).await?;
        Ok(upload.into_receipt())
    }

    // ========== Assistant API ==========

    /// Ask the server to generate a product description
    pub async fn generate_description(&self, request: &DescriptionRequest) -> ClientResult<String> {
        let response: DescriptionResponse = self.post(DESCRIPTION_PATH, request).await?;

        if let Some(status) = response.status.as_deref()
            && !status.eq_ignore_ascii_case(shared::STATUS_SUCCESS)
        {
            return Err(ClientError::Rejected(
                response.message.unwrap_or_else(|| status.to_string()),
            ));
        }

        response
            .payload
            .or(response.description)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ClientError::InvalidResponse("Missing description".to_string()))
    }

    // ========== Product API ==========

    /// Create a product
    pub async fn create_product(&self, payload: &ProductPayload) -> ClientResult<Option<Value>> {
        let envelope: ApiEnvelope<Value> = self.post(PRODUCT_PATH, payload).await?;
        Self::into_payload(envelope)
    }

    /// Update an existing product
    pub async fn update_product(
        &self,
        id: &str,
        payload: &ProductPayload,
    ) -> ClientResult<Option<Value>> {
        let path = format!("{}/{}", PRODUCT_PATH, id);
        let envelope: ApiEnvelope<Value> = self.put(&path, payload).await?;
        Self::into_payload(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> CatalogClient {
        CatalogClient::new(&ClientConfig::new("http://localhost:8000/")).unwrap()
    }

    #[test]
    fn test_url_joining() {
        let client = client();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.url("/api/v1/category"),
            "http://localhost:8000/api/v1/category"
        );
        assert_eq!(
            client.url(PRODUCT_PATH),
            "http://localhost:8000/api/v1/product"
        );
    }

    #[test]
    fn test_empty_base_url_is_config_error() {
        let result = CatalogClient::new(&ClientConfig::new("  "));
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_token() {
        let client = client();
        assert!(client.token().is_none());
        let client = client.with_token("t0k");
        assert_eq!(client.token(), Some("t0k"));
        assert_eq!(client.auth_header().as_deref(), Some("Bearer t0k"));
    }

    #[test]
    fn test_error_for_status_reads_envelope_message() {
        let err = CatalogClient::error_for_status(
            StatusCode::BAD_REQUEST,
            r#"{"status":"error","message":"title is required"}"#.to_string(),
        );
        assert!(matches!(err, ClientError::Validation(ref m) if m == "title is required"));

        let err = CatalogClient::error_for_status(StatusCode::BAD_GATEWAY, "upstream".into());
        assert!(matches!(err, ClientError::Internal(ref m) if m == "upstream"));

        let err = CatalogClient::error_for_status(StatusCode::CONFLICT, "dup".into());
        assert!(matches!(err, ClientError::Api { status: 409, .. }));

        let err = CatalogClient::error_for_status(StatusCode::UNAUTHORIZED, String::new());
        assert!(matches!(err, ClientError::Unauthorized));
    }

    #[test]
    fn test_into_payload_rejects_failed_envelope() {
        let env: ApiEnvelope<Value> = ApiEnvelope::error("duplicate slug");
        let err = CatalogClient::into_payload(env).unwrap_err();
        assert!(matches!(err, ClientError::Rejected(ref m) if m == "duplicate slug"));

        let env = ApiEnvelope::success(serde_json::json!({"_id": "p1"}));
        let payload = CatalogClient::into_payload(env).unwrap();
        assert_eq!(payload.unwrap()["_id"], "p1");
    }
}
