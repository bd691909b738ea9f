//! Todo list HTTP service backed by a concurrent in-memory store.
//!
//! The store owns every todo and hands out identifiers; the API layer maps
//! `(method, path)` pairs onto store operations and renders results as JSON.
//!
//! ```text
//! GET    /api/todos       -> 200 [Todo]
//! POST   /api/todos       -> 201 Todo     | 400
//! GET    /api/todos/{id}  -> 200 Todo     | 400 | 404
//! PUT    /api/todos/{id}  -> 200 Todo     | 400 | 404
//! DELETE /api/todos/{id}  -> 204          | 400 | 404
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`store`]: Todo types and the in-memory store
//! - [`api`]: HTTP routing and handlers
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
