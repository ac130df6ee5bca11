//! Role and permission models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named bundle of permissions assignable to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique role identifier.
    pub id: i64,
    /// Unique role name (e.g. `viewer`).
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
}

/// An atomic grant of a resource + action pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Unique permission identifier.
    pub id: i64,
    /// Unique permission name (e.g. `read_article`).
    pub name: String,
    /// Resource the permission applies to.
    pub resource: Option<String>,
    /// Action allowed on the resource.
    pub action: Option<String>,
}

/// A role with its permissions populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleWithPermissions {
    /// The role row.
    pub role: Role,
    /// Permissions granted by the role.
    pub permissions: Vec<Permission>,
}

/// Data for creating or updating a role by name.
#[derive(Debug, Clone)]
pub struct NewRole {
    /// Role name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Data for creating or updating a permission by name.
#[derive(Debug, Clone)]
pub struct NewPermission {
    /// Permission name.
    pub name: String,
    /// Resource the permission applies to.
    pub resource: Option<String>,
    /// Action allowed on the resource.
    pub action: Option<String>,
}
