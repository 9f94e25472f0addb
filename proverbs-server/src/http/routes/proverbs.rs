//! Proverb listing endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Html,
    routing::get,
    Json, Router,
};

use crate::auth::CurrentUser;
use crate::http::error::ApiError;
use crate::http::templates::{base_context, render};
use crate::models::{proverb, Pagination, PaginationParams, Proverb};
use crate::state::AppState;

/// GET /proverbs?page&limit - one page of the catalogue as HTML
async fn show_proverbs(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Html<String>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest {
        message: e.body_text(),
    })?;
    let page = proverb::page(Pagination::from(params));

    let mut ctx = base_context(&state.config.security, Some(&user));
    ctx.insert("proverbs", &page.items);
    ctx.insert("page", &page.page);
    ctx.insert("limit", &page.limit);
    ctx.insert("total_pages", &page.total_pages());
    ctx.insert("has_prev", &page.has_prev());
    ctx.insert("has_next", &page.has_next());
    render(&state.templates, "proverbs.html", &ctx)
}

/// GET /api/proverbs - the whole catalogue
async fn list_proverbs() -> Json<&'static [Proverb]> {
    Json(proverb::catalogue())
}

/// Browser routes (session-gated by the caller)
pub fn html_router() -> Router<Arc<AppState>> {
    Router::new().route("/proverbs", get(show_proverbs))
}

/// API routes (token-gated by the caller)
pub fn api_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/api/proverbs", get(list_proverbs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn api_lists_full_catalogue() {
        let Json(items) = list_proverbs().await;
        assert_eq!(items.len(), 17);

        let json = serde_json::to_value(items).unwrap();
        assert_eq!(json[0]["chapter"], 1);
        assert_eq!(json[0]["verse"], 7);
    }
}
