//! HTTP API handlers.
//!
//! Every request under the todos prefix goes through [`dispatch`], which
//! resolves the path shape once and then calls exactly one handler per
//! `(method, shape)` pair.

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::routes::TodoPath;
use crate::error::ApiError;
use crate::metrics::{self, Operation};
use crate::store::{MemoryStore, SharedStore, TodoDraft, TodoId};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// The todo store.
    pub store: SharedStore,
    /// Prometheus render handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create app state around an existing store.
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle so `/metrics` can render.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(MemoryStore::shared())
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
    /// Number of todos stored.
    pub todos: usize,
}

/// Health check handler - always returns 200.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        todos: state.store.len().await,
    })
}

/// Prometheus exposition, 404 when metrics are disabled.
pub async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Entry point for all todo API requests.
#[instrument(skip(state, uri, body), fields(path = %uri.path()))]
pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let (operation, result) = route(&state, &method, uri.path(), &body).await;

    let response = match result {
        Ok(response) => response,
        Err(err) => {
            debug!(%operation, error = %err, "request rejected");
            err.into_response()
        }
    };

    metrics::record_request(operation, response.status(), start);
    response
}

async fn route(
    state: &AppState,
    method: &Method,
    path: &str,
    body: &Bytes,
) -> (Operation, Result<Response, ApiError>) {
    // Preflight answers before any path checks.
    if method == Method::OPTIONS {
        return (Operation::Preflight, Ok(StatusCode::OK.into_response()));
    }

    let target = match TodoPath::parse(path) {
        Ok(target) => target,
        Err(err) => return (Operation::Rejected, Err(err)),
    };

    match (method, target) {
        (&Method::GET, TodoPath::Collection) => (Operation::List, list_todos(state).await),
        (&Method::POST, TodoPath::Collection) => {
            (Operation::Create, create_todo(state, body).await)
        }
        (&Method::GET, TodoPath::Item(id)) => (Operation::Get, get_todo(state, id).await),
        (&Method::PUT, TodoPath::Item(id)) => {
            (Operation::Update, update_todo(state, id, body).await)
        }
        (&Method::DELETE, TodoPath::Item(id)) => {
            (Operation::Delete, delete_todo(state, id).await)
        }
        _ => (Operation::Rejected, Err(ApiError::MethodNotAllowed)),
    }
}

fn decode_draft(body: &Bytes) -> Result<TodoDraft, ApiError> {
    serde_json::from_slice(body).map_err(|err| {
        debug!(%err, "undecodable todo payload");
        ApiError::invalid_body()
    })
}

async fn list_todos(state: &AppState) -> Result<Response, ApiError> {
    let todos = state.store.list_all().await;
    Ok((StatusCode::OK, Json(todos)).into_response())
}

async fn get_todo(state: &AppState, id: TodoId) -> Result<Response, ApiError> {
    let todo = state.store.get(id).await?;
    Ok((StatusCode::OK, Json(todo)).into_response())
}

async fn create_todo(state: &AppState, body: &Bytes) -> Result<Response, ApiError> {
    let draft = decode_draft(body)?;
    if draft.has_empty_title() {
        return Err(ApiError::title_required());
    }

    let todo = state.store.create(draft).await;
    info!(id = todo.id, "todo created");

    Ok((StatusCode::CREATED, Json(todo)).into_response())
}

async fn update_todo(state: &AppState, id: TodoId, body: &Bytes) -> Result<Response, ApiError> {
    let draft = decode_draft(body)?;
    let todo = state.store.update(id, draft).await?;
    info!(id, completed = todo.completed, "todo updated");

    Ok((StatusCode::OK, Json(todo)).into_response())
}

async fn delete_todo(state: &AppState, id: TodoId) -> Result<Response, ApiError> {
    state.store.delete(id).await?;
    info!(id, "todo deleted");

    Ok(StatusCode::NO_CONTENT.into_response())
}
