//! Database layer - connection pool, readiness check, schema and repositories
//!
//! # Design Principles
//!
//! - One pool handle, created at startup and passed down explicitly
//! - The pool is lazy; the readiness check connects on its own, outside the pool
//! - Rely on DB constraints, handle conflicts - no check-then-insert

pub mod error;
pub mod migrations;
pub mod pool;
pub mod readiness;
pub mod repos;

pub use error::DbError;
pub use pool::create_pool;
pub use readiness::{wait_until_ready, ConnectProbe, Probe, Readiness, RetryPolicy};
pub use repos::*;
