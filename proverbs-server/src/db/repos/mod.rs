//! Repository implementations for database access
//!
//! Each repository borrows the pool and follows these patterns:
//! - Handles conflicts via ON CONFLICT or unique violations (no check-then-insert)
//! - Uses JOINs for list operations (no N+1)

pub mod roles;
pub mod sessions;
pub mod users;

pub use roles::{Role, RoleRepo, RoleWithCount};
pub use sessions::{SessionRepo, SessionUser};
pub use users::{NewUser, User, UserRepo};
