use crate::auth::{LoginRequest, TokenResponse};
use crate::error::{AppError, AppResult};
use crate::models::{RegisterRequest, UserResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use super::AppState;

/// Register a new user
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let password_hash = state.auth_service.hash_password(&payload.password)?;
    let user = state
        .users
        .create_user(&payload.username, &password_hash)
        .await?;

    info!(user_id = user.id, "Registered user");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Exchange credentials for a JWT access token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let rejected = || AppError::Unauthorized("Incorrect username or password".to_string());

    let user = state
        .users
        .get_user_by_username(&payload.username)
        .await?
        .ok_or_else(rejected)?;

    if !state
        .auth_service
        .verify_password(&payload.password, &user.password_hash)?
    {
        return Err(rejected());
    }

    if !user.is_active {
        return Err(AppError::Unauthorized("User account is inactive".to_string()));
    }

    let access_token = state.auth_service.generate_token(user.id, &user.username)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
