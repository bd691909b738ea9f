//! HTTP API route definitions.

use std::path::Path;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::routing::{any, get};
use axum::Router;
use percent_encoding::percent_decode_str;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{dispatch, health, render_metrics, AppState};
use crate::error::ApiError;
use crate::store::TodoId;

/// Collection path of the todo API.
pub const TODOS_PATH: &str = "/api/todos";

/// Target of a todo API request, resolved from its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoPath {
    /// `/api/todos` or `/api/todos/`.
    Collection,
    /// `/api/todos/{id}`.
    Item(TodoId),
}

impl TodoPath {
    /// Resolve a request path under [`TODOS_PATH`].
    ///
    /// The remainder after the prefix is percent-decoded first, so
    /// `/api/todos/%31` targets item 1.
    pub fn parse(path: &str) -> Result<Self, ApiError> {
        let rest = path
            .strip_prefix(TODOS_PATH)
            .ok_or_else(ApiError::invalid_id)?;
        let rest = percent_decode_str(rest)
            .decode_utf8()
            .map_err(|_| ApiError::invalid_id())?;

        match &*rest {
            "" | "/" => Ok(TodoPath::Collection),
            rest => rest
                .strip_prefix('/')
                .and_then(|segment| segment.parse::<TodoId>().ok())
                .map(TodoPath::Item)
                .ok_or_else(ApiError::invalid_id),
        }
    }
}

/// Create the API router: todos, health, and metrics.
///
/// Todo responses always carry a JSON content type and permissive CORS
/// headers, errors included.
pub fn api_router(state: AppState) -> Router {
    let todos = Router::new()
        .route(TODOS_PATH, any(dispatch))
        .route("/api/todos/", any(dispatch))
        .route("/api/todos/*rest", any(dispatch))
        // Bodies are buffered whole, with no size cap.
        .layer(DefaultBodyLimit::disable())
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ));

    Router::new()
        .merge(todos)
        // Health endpoints
        .route("/health", get(health))
        // Metrics endpoint
        .route("/metrics", get(render_metrics))
        .with_state(state)
}

/// Create the full application router, serving `static_dir` for every
/// path the API does not claim.
pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    api_router(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
}
