//! In-process stand-in for the inventory API.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;

use stock_client::api::ApiClient;
use stock_client::api::session::{MemoryTokenStore, Session};
use stock_client::repository::HttpRepository;

/// A request as seen by the server.
#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    content_type: &'static str,
    body: Vec<u8>,
    delay: Duration,
}

/// Serves canned responses keyed by method and path and records every request.
#[derive(Clone, Default)]
pub struct MockApi {
    routes: Arc<Mutex<HashMap<(Method, String), Canned>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(&self, method: Method, path: &str, status: u16, body: serde_json::Value) -> &Self {
        self.canned(method, path, status, "application/json", body.to_string().into_bytes())
    }

    pub fn text(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        self.canned(method, path, status, "text/plain", body.as_bytes().to_vec())
    }

    pub fn bytes(&self, method: Method, path: &str, body: &[u8]) -> &Self {
        self.canned(method, path, 200, "application/pdf", body.to_vec())
    }

    /// Holds the response to `method path` back for `delay` after recording
    /// the request.
    pub fn delay(&self, method: Method, path: &str, delay: Duration) -> &Self {
        if let Some(canned) = self.routes.lock().get_mut(&(method, path.to_string())) {
            canned.delay = delay;
        }
        self
    }

    fn canned(
        &self,
        method: Method,
        path: &str,
        status: u16,
        content_type: &'static str,
        body: Vec<u8>,
    ) -> &Self {
        let status = StatusCode::from_u16(status).expect("valid status code");
        self.routes.lock().insert(
            (method, path.to_string()),
            Canned {
                status,
                content_type,
                body,
                delay: Duration::ZERO,
            },
        );
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests
            .lock()
            .last()
            .cloned()
            .expect("at least one request")
    }

    /// Waits until the server has seen `count` requests.
    pub async fn wait_for_requests(&self, count: usize) {
        while self.requests.lock().len() < count {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    /// Binds an ephemeral port and returns the base URL.
    pub async fn start(&self) -> String {
        let app = Router::new().fallback(respond).with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server");
        });
        format!("http://{addr}")
    }
}

async fn respond(State(api): State<MockApi>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let header_value = |name| {
        parts
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    api.requests.lock().push(Recorded {
        method: parts.method.clone(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        headers: parts.headers.clone(),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let canned = api
        .routes
        .lock()
        .get(&(parts.method, parts.uri.path().to_string()))
        .cloned();

    match canned {
        Some(canned) => {
            tokio::time::sleep(canned.delay).await;
            (
                canned.status,
                [(header::CONTENT_TYPE, canned.content_type)],
                canned.body,
            )
                .into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"detail":"Not Found"}"#,
        )
            .into_response(),
    }
}

pub fn session_with_token(token: &str) -> Arc<Session> {
    Arc::new(Session::new(MemoryTokenStore::with_token(token)))
}

pub fn repository(base_url: &str, session: Arc<Session>) -> HttpRepository {
    let client = ApiClient::new(base_url, None).expect("build client");
    HttpRepository::new(client, session)
}
