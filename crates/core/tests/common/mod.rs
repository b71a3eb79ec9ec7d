//! In-process fake of the REST backend
//!
//! Serves `GET/POST /{collection}`, `GET /{collection}/` and
//! `PUT /{collection}/{id}` from memory and records every request.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct BackendState {
    collections: HashMap<String, Vec<Value>>,
    requests: Vec<RecordedRequest>,
    failing: bool,
    failing_methods: Vec<String>,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<BackendState>>,
}

impl FakeBackend {
    pub async fn insert(&self, collection: &str, record: Value) {
        let mut state = self.state.lock().await;
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(record);
    }

    pub async fn records(&self, collection: &str) -> Vec<Value> {
        let state = self.state.lock().await;
        state.collections.get(collection).cloned().unwrap_or_default()
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().await.requests.clone()
    }

    /// Answer every request with HTTP 500
    pub async fn set_failing(&self, failing: bool) {
        self.state.lock().await.failing = failing;
    }

    /// Answer only requests with `method` with HTTP 500
    pub async fn fail_method(&self, method: &str) {
        self.state.lock().await.failing_methods.push(method.to_string());
    }
}

fn id_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(id)) => Some(id.clone()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    }
}

async fn handle(
    State(backend): State<FakeBackend>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let body: Option<Value> = serde_json::from_slice(&body).ok();
    let mut state = backend.state.lock().await;

    state.requests.push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body: body.clone(),
    });

    if state.failing || state.failing_methods.iter().any(|m| m == method.as_str()) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "backend unavailable" })),
        );
    }

    let segments: Vec<&str> = uri.path().split('/').filter(|s| !s.is_empty()).collect();
    let wanted_id = uri
        .query()
        .and_then(|q| q.split('&').find_map(|pair| pair.strip_prefix("id=")))
        .map(str::to_string);

    match (method.as_str(), segments.as_slice()) {
        ("GET", [collection]) => {
            let records = state
                .collections
                .get(*collection)
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .filter(|r| match &wanted_id {
                    Some(id) => id_text(r.get("id")).as_deref() == Some(id.as_str()),
                    None => true,
                })
                .collect();
            (StatusCode::OK, Json(Value::Array(records)))
        }
        ("POST", [collection]) => {
            let record = body.unwrap_or(Value::Null);
            state
                .collections
                .entry(collection.to_string())
                .or_default()
                .push(record.clone());
            (StatusCode::CREATED, Json(record))
        }
        ("PUT", [collection, id]) => {
            let record = body.unwrap_or(Value::Null);
            let records = state.collections.entry(collection.to_string()).or_default();
            match records
                .iter()
                .position(|r| id_text(r.get("id")).as_deref() == Some(*id))
            {
                Some(index) => {
                    records[index] = record.clone();
                    (StatusCode::OK, Json(record))
                }
                None => (StatusCode::NOT_FOUND, Json(json!({}))),
            }
        }
        _ => (StatusCode::NOT_FOUND, Json(json!({}))),
    }
}

/// Start a fake backend on an ephemeral port, returning its base URL
pub async fn spawn_backend() -> (String, FakeBackend) {
    let backend = FakeBackend::default();
    let app = Router::new().fallback(handle).with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), backend)
}

/// A base URL nothing is listening on
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
