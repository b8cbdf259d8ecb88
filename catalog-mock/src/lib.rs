//! Scripted catalog API for integration tests
//!
//! Answers each request from a fixed route table and records what it
//! received, so tests can assert on method, headers and body.
//!
//! ```ignore
//! let catalog = MockCatalog::new()
//!     .ok(Method::GET, "/api/v1/category", json!({"status": "success", "payload": []}))
//!     .start()
//!     .await?;
//! let client = ClientConfig::new(catalog.base_url()).build_client()?;
//! ```

use axum::{
    Json, Router,
    body::{Bytes, to_bytes},
    extract::{Request, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub use axum::http::{Method, StatusCode};

/// A request as the mock received it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Body as text, lossy for binary parts
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body parsed as JSON, `null` when it is not JSON
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn is(&self, method: Method, path: &str) -> bool {
        self.method == method && self.path == path
    }
}

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    path: String,
    status: StatusCode,
    body: Value,
}

struct MockState {
    routes: Vec<Route>,
    requests: Mutex<Vec<Recorded>>,
}

/// Route table of a mock catalog, before it is started
#[derive(Debug, Default)]
pub struct MockCatalog {
    routes: Vec<Route>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with `status` and a JSON body
    pub fn route(
        mut self,
        method: Method,
        path: impl Into<String>,
        status: StatusCode,
        body: Value,
    ) -> Self {
        self.routes.push(Route {
            method,
            path: path.into(),
            status,
            body,
        });
        self
    }

    /// Answer `method path` with `200 OK`
    pub fn ok(self, method: Method, path: impl Into<String>, body: Value) -> Self {
        self.route(method, path, StatusCode::OK, body)
    }

    /// Bind an ephemeral local port and start serving
    pub async fn start(self) -> std::io::Result<RunningCatalog> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let state = Arc::new(MockState {
            routes: self.routes,
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new().fallback(answer).with_state(state.clone());

        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Mock catalog stopped");
            }
        });

        Ok(RunningCatalog { addr, state, task })
    }
}

/// A mock catalog serving on a local port; stops when dropped
pub struct RunningCatalog {
    addr: SocketAddr,
    state: Arc<MockState>,
    task: JoinHandle<()>,
}

impl RunningCatalog {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().clone()
    }
}

impl Drop for RunningCatalog {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn answer(State(state): State<Arc<MockState>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    let path = parts.uri.path().to_string();
    let route = state
        .routes
        .iter()
        .find(|r| r.method == parts.method && r.path == path)
        .cloned();

    state.requests.lock().push(Recorded {
        method: parts.method,
        path,
        headers: parts.headers,
        body,
    });

    match route {
        Some(route) => (route.status, Json(route.body)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"status": "error", "message": "no route"})),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn state(routes: Vec<Route>) -> Arc<MockState> {
        Arc::new(MockState {
            routes,
            requests: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn test_answers_from_route_table() {
        let state = state(vec![Route {
            method: Method::POST,
            path: "/api/v1/product".into(),
            status: StatusCode::CREATED,
            body: json!({"status": "success"}),
        }]);
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/api/v1/product?draft=1")
            .header("authorization", "Bearer t")
            .body(Body::from(r#"{"title":"Mug"}"#))
            .unwrap();

        let response = answer(State(state.clone()), request).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let recorded = state.requests.lock()[0].clone();
        assert!(recorded.is(Method::POST, "/api/v1/product"));
        assert_eq!(recorded.header("authorization"), Some("Bearer t"));
        assert_eq!(recorded.json()["title"], "Mug");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let state = state(Vec::new());
        let request = axum::http::Request::builder()
            .uri("/missing")
            .body(Body::empty())
            .unwrap();

        let response = answer(State(state.clone()), request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(state.requests.lock().len(), 1);
        assert_eq!(state.requests.lock()[0].json(), Value::Null);
    }
}
