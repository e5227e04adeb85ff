use crate::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::CreateUrlRequest;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json, Redirect};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use super::types::ListUrlsQuery;
use super::AppState;

/// Service banner
pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Welcome to URL Shortener API" }))
}

/// Create a short URL, or return the caller's live one for the same URL
pub async fn shorten_url(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateUrlRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = state
        .shortener
        .create_short_url(&payload.original_url, user.id, payload.expires_in_days)
        .await?;

    Ok(Json(response))
}

/// Resolve a short URL and redirect
pub async fn redirect_to_url(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> AppResult<Redirect> {
    let original_url = state.shortener.resolve(&code).await?;
    Ok(Redirect::temporary(&original_url))
}

/// Get information about one of the caller's short URLs
pub async fn get_url_info(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(code): Path<String>,
) -> AppResult<impl IntoResponse> {
    let info = state.shortener.get_url_info(&code, user.id).await?;
    Ok(Json(info))
}

/// List the caller's short URLs (paginated)
pub async fn list_my_urls(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<ListUrlsQuery>,
) -> AppResult<impl IntoResponse> {
    let (skip, limit) = query.page();
    let urls = state.shortener.list_owner_urls(user.id, skip, limit).await?;
    Ok(Json(urls))
}
