//! Auth handlers: register, login, refresh, logout.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use rolegate_auth::TokenPair;

use crate::dto::request::{LoginRequest, RefreshRequest, RegisterRequest, validate_request};
use crate::dto::response::AuthResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    validate_request(&req)?;

    let session = state
        .auth_service
        .register(&req.username, &req.email, &req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse::from(session))))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let session = state
        .auth_service
        .login(&req.username, &req.password)
        .await?;

    Ok(Json(AuthResponse::from(session)))
}

/// POST /auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let tokens = state.auth_service.refresh(&req.refresh_token).await?;
    Ok(Json(tokens))
}

/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<StatusCode, ApiError> {
    state.auth_service.logout(&req.refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}
