// catalog-client/tests/client_integration.rs
// Round trips against a scripted local catalog API

use std::sync::{Arc, Mutex};

use catalog_client::{ClientConfig, ClientError, DescriptionRequest, ProgressFn};
use catalog_mock::{Method, MockCatalog, StatusCode};
use serde_json::json;

#[tokio::test]
async fn test_fetch_categories() {
    let catalog = MockCatalog::new()
        .ok(
            Method::GET,
            "/api/v1/category",
            json!({
                "status": "success",
                "payload": [
                    {"_id": "1", "name": "A", "children": [
                        {"_id": "2", "name": "B", "children": []}
                    ]}
                ]
            }),
        )
        .start()
        .await
        .unwrap();

    let client = ClientConfig::new(catalog.base_url())
        .with_token("secret")
        .build_client()
        .unwrap();
    let tree = client.fetch_categories().await.unwrap();

    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].name, "A");
    assert_eq!(tree[0].children[0].id.as_str(), "2");

    let requests = catalog.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].is(Method::GET, "/api/v1/category"));
    assert_eq!(requests[0].header("authorization"), Some("Bearer secret"));
}

#[tokio::test]
async fn test_upload_media_reports_progress_and_normalizes_payload() {
    let catalog = MockCatalog::new()
        .ok(
            Method::POST,
            "/api/v1/upload",
            json!({
                "status": "success",
                "payload": {"secure_url": "https://cdn.example.com/x.jpg"}
            }),
        )
        .start()
        .await
        .unwrap();

    let client = ClientConfig::new(catalog.base_url())
        .with_upload_chunk_size(256)
        .build_client()
        .unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let progress: ProgressFn = Arc::new(move |p| sink.lock().unwrap().push(p));

    let receipt = client
        .upload_media("x.png", "image/png", vec![7u8; 1024], progress)
        .await
        .unwrap();

    assert!(receipt.is_success());
    assert_eq!(
        receipt.primary_reference(),
        Some("https://cdn.example.com/x.jpg")
    );

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen, vec![25, 50, 75, 100]);

    let requests = catalog.requests();
    assert!(requests[0].is(Method::POST, "/api/v1/upload"));
    let body = requests[0].text();
    assert!(body.contains("name=\"images\""));
    assert!(body.contains("filename=\"x.png\""));
}

#[tokio::test]
async fn test_generate_description_accepts_legacy_shape() {
    let catalog = MockCatalog::new()
        .ok(
            Method::POST,
            "/api/v1/ai/generate-description",
            json!({"description": "A sturdy mug."}),
        )
        .start()
        .await
        .unwrap();
    let client = ClientConfig::new(catalog.base_url()).build_client().unwrap();

    let text = client
        .generate_description(&DescriptionRequest {
            title: Some("Mug".into()),
            category: "Kitchen".into(),
            tags: None,
            brand: None,
        })
        .await
        .unwrap();
    assert_eq!(text, "A sturdy mug.");

    let requests = catalog.requests();
    assert!(requests[0].is(Method::POST, "/api/v1/ai/generate-description"));
    assert_eq!(requests[0].json()["category"], "Kitchen");
}

#[tokio::test]
async fn test_server_error_surfaces_envelope_message() {
    let catalog = MockCatalog::new()
        .route(
            Method::PUT,
            "/api/v1/product/p1",
            StatusCode::BAD_REQUEST,
            json!({"status": "error", "message": "price must be positive"}),
        )
        .start()
        .await
        .unwrap();
    let client = ClientConfig::new(catalog.base_url()).build_client().unwrap();

    let err = client
        .update_product("p1", &Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(ref m) if m == "price must be positive"));

    assert!(catalog.requests()[0].is(Method::PUT, "/api/v1/product/p1"));
}
