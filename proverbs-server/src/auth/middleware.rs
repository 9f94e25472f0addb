//! Request gating middleware
//!
//! Both layers resolve the presented token and insert a [`CurrentUser`]
//! extension. They differ only in what an anonymous request gets back:
//! - [`require_session`]: 303 redirect to the login page (HTML routes)
//! - [`require_token`]: 401 JSON (API routes)

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::{resolve_session, token_from_headers, CurrentUser};
use crate::http::ApiError;
use crate::state::AppState;

async fn current_user(state: &AppState, token: Option<String>) -> Result<Option<CurrentUser>, ApiError> {
    let Some(token) = token else {
        return Ok(None);
    };
    Ok(resolve_session(&state.pool, &state.tokens, &token).await?)
}

/// Gate for browser routes.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = token_from_headers(request.headers());
    match current_user(&state, token).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) => {
            let next_path = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/");
            Redirect::to(&login_redirect(next_path)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Gate for API routes.
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = token_from_headers(request.headers());
    match current_user(&state, token).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) => ApiError::Unauthorized.into_response(),
        Err(e) => e.into_response(),
    }
}

/// Login URL that returns to `next` afterwards.
pub fn login_redirect(next: &str) -> String {
    format!("/login?next={}", urlencoding::encode(next))
}
