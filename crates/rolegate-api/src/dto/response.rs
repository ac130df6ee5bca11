//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rolegate_auth::rbac::{permissions_of, roles_of};
use rolegate_auth::{AuthSession, TokenPair};
use rolegate_entity::user::UserWithRoles;

/// User summary returned by register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    /// Role names, sorted.
    pub roles: Vec<String>,
}

impl From<&UserWithRoles> for UserResponse {
    fn from(u: &UserWithRoles) -> Self {
        Self {
            id: u.user.id,
            username: u.user.username.clone(),
            email: u.user.email.clone(),
            is_active: u.user.is_active,
            created_at: u.user.created_at,
            roles: roles_of(u),
        }
    }
}

/// Register and login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub tokens: TokenPair,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user: UserResponse::from(&session.user),
            tokens: session.tokens,
        }
    }
}

/// Profile of the calling user, including the effective permission set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserMeResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub roles: Vec<String>,
    /// Union of permissions across roles, sorted.
    pub permissions: Vec<String>,
}

impl From<&UserWithRoles> for UserMeResponse {
    fn from(u: &UserWithRoles) -> Self {
        Self {
            id: u.user.id,
            username: u.user.username.clone(),
            email: u.user.email.clone(),
            is_active: u.user.is_active,
            created_at: u.user.created_at,
            roles: roles_of(u),
            permissions: permissions_of(u),
        }
    }
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Readiness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: String,
    /// `"connected"` or `"unavailable"`.
    pub store: String,
}
