use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{BatchError, ProviderError};
use crate::provider::{AcmeDnsProvider, RecordAppender, RecordDeleter, RecordGetter, RecordSetter};
use crate::record::{Record, ResourceRecord};

pub struct AppState {
    pub provider: AcmeDnsProvider,
    pub key: Option<String>,
}

#[derive(Serialize)]
struct ApiResponse {
    success: bool,
    records: Vec<Record>,
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    records: Vec<Record>,
}

#[derive(Deserialize)]
struct AuthQuery {
    key: Option<String>,
}

#[derive(Deserialize)]
struct RecordsBody {
    #[serde(default)]
    records: Vec<Record>,
}

pub fn create_router(provider: AcmeDnsProvider, key: Option<String>) -> Router {
    let state = Arc::new(AppState { provider, key });

    Router::new()
        .route(
            "/records/{zone}",
            get(get_records)
                .post(append_records)
                .put(set_records)
                .delete(delete_records),
        )
        // Only wraps the routes above; /health stays open.
        .route_layer(middleware::from_fn_with_state(state.clone(), require_key))
        .route("/health", get(health_check))
        .layer(middleware::from_fn(access_log))
        .with_state(state)
}

async fn access_log(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().clone();
    // Query strings may carry the access key, log the path only.
    let path = request.uri().path().to_string();
    let user_agent = request
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let ip = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(',').next().unwrap_or("-").trim().to_string())
        .or_else(|| {
            request
                .headers()
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| "-".to_string());

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let length = response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    let duration = start.elapsed();

    // Access log format: method path "user-agent" ip status length duration
    info!(
        target: "access",
        "{} {} \"{}\" {} {} {} {:.3}ms",
        method, path, user_agent, ip, status, length, duration.as_secs_f64() * 1000.0
    );

    response
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}

async fn require_key(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuthQuery>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(ref expected) = state.key {
        if query.key.as_deref().unwrap_or("") != expected.as_str() {
            warn!("Invalid key for {} {}", request.method(), request.uri().path());
            return error_response(StatusCode::UNAUTHORIZED, "Invalid key".to_string());
        }
    }

    next.run(request).await
}

fn error_response(status: StatusCode, error: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error,
            records: Vec::new(),
        }),
    )
        .into_response()
}

fn status_for(error: &ProviderError) -> StatusCode {
    match error {
        ProviderError::UnsupportedRecordType { .. } => StatusCode::BAD_REQUEST,
        ProviderError::ConfigNotFound { .. } => StatusCode::NOT_FOUND,
        ProviderError::EmptyField { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        ProviderError::Transport(_)
        | ProviderError::Cancelled
        | ProviderError::UnexpectedStatus { .. } => StatusCode::BAD_GATEWAY,
        ProviderError::GetNotSupported => StatusCode::NOT_IMPLEMENTED,
    }
}

fn into_records(records: Vec<ResourceRecord>) -> Vec<Record> {
    records.into_iter().map(Record::from).collect()
}

fn batch_response(zone: &str, result: Result<Vec<ResourceRecord>, BatchError>) -> Response {
    match result {
        Ok(records) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                records: into_records(records),
            }),
        )
            .into_response(),
        Err(BatchError { applied, source }) => {
            let status = status_for(&source);
            if status.is_server_error() {
                error!(
                    "Update for zone {} failed after {} record(s): {}",
                    zone,
                    applied.len(),
                    source
                );
            } else {
                warn!("Rejected update for zone {}: {}", zone, source);
            }
            (
                status,
                Json(ErrorResponse {
                    success: false,
                    error: source.to_string(),
                    records: into_records(applied),
                }),
            )
                .into_response()
        }
    }
}

/// Decodes the request body, answering malformed bodies in the API's own
/// error format.
fn resource_records(
    body: Result<Json<RecordsBody>, JsonRejection>,
) -> Result<Vec<ResourceRecord>, Response> {
    match body {
        Ok(Json(body)) => Ok(body.records.iter().map(ResourceRecord::from).collect()),
        Err(rejection) => {
            warn!("Rejected request body: {}", rejection.body_text());
            Err(error_response(StatusCode::BAD_REQUEST, rejection.body_text()))
        }
    }
}

async fn append_records(
    State(state): State<Arc<AppState>>,
    Path(zone): Path<String>,
    body: Result<Json<RecordsBody>, JsonRejection>,
) -> Response {
    let records = match resource_records(body) {
        Ok(records) => records,
        Err(response) => return response,
    };
    let result = state.provider.append_records(&zone, &records).await;
    batch_response(&zone, result)
}

async fn set_records(
    State(state): State<Arc<AppState>>,
    Path(zone): Path<String>,
    body: Result<Json<RecordsBody>, JsonRejection>,
) -> Response {
    let records = match resource_records(body) {
        Ok(records) => records,
        Err(response) => return response,
    };
    let result = state.provider.set_records(&zone, &records).await;
    batch_response(&zone, result)
}

/// Any body is ignored: nothing is ever deleted upstream.
async fn delete_records(State(state): State<Arc<AppState>>, Path(zone): Path<String>) -> Response {
    let result = state.provider.delete_records(&zone, &[]).await;
    batch_response(&zone, result)
}

async fn get_records(State(state): State<Arc<AppState>>, Path(zone): Path<String>) -> Response {
    let result = state.provider.get_records(&zone).await;
    batch_response(&zone, result.map_err(BatchError::from))
}
