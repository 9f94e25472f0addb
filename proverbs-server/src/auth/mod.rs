//! Authentication - password hashing, sessions and request gating
//!
//! Login flow:
//! 1. [`verify_credentials`] checks the password against an active user
//! 2. [`start_session`] stores the token digest and returns the token
//! 3. The middleware resolves the token on every gated request into a
//!    [`CurrentUser`] request extension

pub mod middleware;
pub mod password;
pub mod session;

use serde::Serialize;
use sqlx::PgPool;

use crate::db::{DbError, SessionRepo, User, UserRepo};

pub use middleware::{require_session, require_token};
pub use password::Passwords;
pub use session::{token_from_headers, SessionTokens, SESSION_COOKIE, TOKEN_HEADER};

/// Authentication error type
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown login, wrong password or inactive account.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// The authenticated user behind a request
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}

/// Check a login/password pair.
///
/// Every failure mode collapses into [`AuthError::InvalidCredentials`] so
/// callers can't tell which part was wrong.
pub async fn verify_credentials(
    pool: &PgPool,
    passwords: &Passwords,
    login: &str,
    password: &str,
) -> Result<User, AuthError> {
    let user = UserRepo::new(pool).find_by_login(login).await?;

    // Unknown logins are checked against a dummy hash so they take as long
    // as known ones.
    let stored = match &user {
        Some(user) => user.password.clone(),
        None => password::DUMMY_HASH.clone(),
    };
    let matches = passwords.verify_blocking(password.to_owned(), stored).await?;

    let Some(user) = user else {
        tracing::debug!(login, "login for unknown user");
        return Err(AuthError::InvalidCredentials);
    };
    if !matches || !user.active {
        tracing::debug!(user = %user.username, active = user.active, "login rejected");
        return Err(AuthError::InvalidCredentials);
    }

    Ok(user)
}

/// Open a session for `user_id`, returning the token for the client.
pub async fn start_session(
    pool: &PgPool,
    tokens: &SessionTokens,
    user_id: i32,
) -> Result<String, AuthError> {
    let (token, digest) = tokens.issue();
    SessionRepo::new(pool)
        .create(&digest, user_id, tokens.ttl())
        .await?;
    Ok(token)
}

/// Drop the session behind `token`, if any.
pub async fn end_session(pool: &PgPool, tokens: &SessionTokens, token: &str) -> Result<bool, AuthError> {
    Ok(SessionRepo::new(pool).delete(&tokens.digest(token)).await?)
}

/// Resolve a token into the user it belongs to.
///
/// Expired sessions and inactive users resolve to `None`.
pub async fn resolve_session(
    pool: &PgPool,
    tokens: &SessionTokens,
    token: &str,
) -> Result<Option<CurrentUser>, DbError> {
    let Some(session) = SessionRepo::new(pool).lookup(&tokens.digest(token)).await? else {
        return Ok(None);
    };
    let roles = UserRepo::new(pool).roles(session.user_id).await?;

    Ok(Some(CurrentUser {
        id: session.user_id,
        username: session.username,
        email: session.email,
        roles,
    }))
}
