//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::role::RoleWithPermissions;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: i64,
    /// Unique login name (case-sensitive).
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Argon2id PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Whether the account may authenticate.
    pub is_active: bool,
    /// Superusers pass every permission check.
    pub is_superuser: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
}

/// A user together with its roles and their permissions, loaded in one
/// round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWithRoles {
    /// The user row.
    pub user: User,
    /// Roles held by the user, each with its permissions populated.
    pub roles: Vec<RoleWithPermissions>,
}

impl UserWithRoles {
    /// Returns the user ID.
    pub fn id(&self) -> i64 {
        self.user.id
    }

    /// Returns whether the account may authenticate.
    pub fn is_active(&self) -> bool {
        self.user.is_active
    }
}
