//! HTTP API module for the todo endpoints, health, and metrics.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::{api_router, create_router, TodoPath, TODOS_PATH};
