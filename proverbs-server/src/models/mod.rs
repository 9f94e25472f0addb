//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod account;
pub mod pagination;
pub mod proverb;
pub mod role;
pub mod validation;

pub use account::{Email, Password, Username};
pub use pagination::{Paginated, Pagination, PaginationParams};
pub use proverb::Proverb;
pub use role::RoleName;
pub use validation::ValidationError;
