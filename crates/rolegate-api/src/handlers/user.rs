//! User handlers.

use axum::Json;
use axum::extract::{Path, State};

use rolegate_core::error::AppError;
use rolegate_database::store::UserStore;

use crate::dto::response::{UserMeResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /users/me
pub async fn me(auth: AuthUser) -> Json<UserMeResponse> {
    Json(UserMeResponse::from(&auth.0))
}

/// GET /users/{id}
///
/// Requires the `read_user` permission.
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    state.rbac_enforcer.require_permission(&auth, "read_user")?;

    let user = {
        let mut uow = state.store.begin().await?;
        uow.load_user_with_roles(id).await?
    }
    .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;

    Ok(Json(UserResponse::from(&user)))
}
