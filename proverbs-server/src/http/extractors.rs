//! Custom Axum extractors

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::error::ApiError;
use crate::auth::CurrentUser;

/// The user the auth middleware attached to this request.
///
/// Only usable behind [`require_session`](crate::auth::require_session) or
/// [`require_token`](crate::auth::require_token).
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}

/// A session token presented by the client, if any
pub struct MaybeToken(pub Option<String>);

impl<S> FromRequestParts<S> for MaybeToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(crate::auth::token_from_headers(&parts.headers)))
    }
}
