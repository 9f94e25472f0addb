//! Landing page

use std::sync::Arc;

use axum::{extract::State, response::Html, routing::get, Router};

use crate::auth::CurrentUser;
use crate::http::error::ApiError;
use crate::http::templates::{base_context, render};
use crate::state::AppState;

/// GET|POST / , /home , /home/
async fn home(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Html<String>, ApiError> {
    let ctx = base_context(&state.config.security, Some(&user));
    render(&state.templates, "home.html", &ctx)
}

/// Home routes (session-gated by the caller)
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home).post(home))
        .route("/home", get(home).post(home))
        .route("/home/", get(home).post(home))
}
