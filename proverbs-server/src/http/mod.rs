//! HTTP server layer
//!
//! Axum server with:
//! - Session-gated HTML pages and token-gated JSON API
//! - Request tracing
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;
pub mod templates;

pub use error::ApiError;
pub use server::{build_router, run_server, ServerError};
