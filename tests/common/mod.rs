//! Shared test helpers: an in-process ACME-DNS `/update` endpoint.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use acmedns::{AcmeDnsConfig, DomainConfig};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

/// One request received by [`MockAcmeDns`].
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedRequest {
    pub api_user: Option<String>,
    pub api_key: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct MockState {
    requests: Mutex<Vec<CapturedRequest>>,
    /// Status per subdomain; anything else answers 200.
    statuses: HashMap<String, u16>,
    delay: Option<Duration>,
}

pub struct MockAcmeDns {
    pub url: String,
    state: Arc<MockState>,
}

impl MockAcmeDns {
    pub async fn start() -> Self {
        Self::spawn(MockState::default()).await
    }

    /// Answers `status` to updates for `subdomain`.
    pub async fn failing(subdomain: &str, status: u16) -> Self {
        Self::spawn(MockState {
            statuses: HashMap::from([(subdomain.to_string(), status)]),
            ..MockState::default()
        })
        .await
    }

    /// Holds every response for `delay`.
    pub async fn slow(delay: Duration) -> Self {
        Self::spawn(MockState {
            delay: Some(delay),
            ..MockState::default()
        })
        .await
    }

    async fn spawn(state: MockState) -> Self {
        let state = Arc::new(state);
        let app = Router::new()
            .route("/update", post(update))
            .with_state(state.clone());
        let url = serve(app).await;
        Self { url, state }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Subdomains of the received updates, in order.
    pub fn subdomains(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r.body["subdomain"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    pub fn account(&self, subdomain: &str) -> DomainConfig {
        DomainConfig {
            username: format!("user-{subdomain}"),
            password: format!("key-{subdomain}"),
            subdomain: subdomain.to_string(),
            fulldomain: format!("{subdomain}.auth.example"),
            server_url: self.url.clone(),
        }
    }

    /// Table config mapping each domain to an account named after `subdomain`.
    pub fn table(&self, entries: &[(&str, &str)]) -> AcmeDnsConfig {
        AcmeDnsConfig::table(
            entries
                .iter()
                .map(|(domain, subdomain)| (domain.to_string(), self.account(subdomain)))
                .collect(),
        )
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn update(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Value>) {
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    let subdomain = body["subdomain"].as_str().unwrap_or_default().to_string();
    let txt = body["txt"].clone();

    state.requests.lock().unwrap().push(CapturedRequest {
        api_user: header(&headers, "x-api-user"),
        api_key: header(&headers, "x-api-key"),
        content_type: header(&headers, "content-type"),
        body,
    });

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    let status = state.statuses.get(&subdomain).copied().unwrap_or(200);
    (
        StatusCode::from_u16(status).unwrap(),
        Json(json!({ "txt": txt })),
    )
}

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
