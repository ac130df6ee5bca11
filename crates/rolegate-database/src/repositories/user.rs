//! User queries, including the joined user → roles → permissions load.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use rolegate_core::error::{AppError, ErrorKind};
use rolegate_core::result::AppResult;
use rolegate_entity::role::{Permission, Role, RoleWithPermissions};
use rolegate_entity::user::{NewUser, User, UserWithRoles};

use crate::error::map_sqlx_error;
use crate::postgres::PgUnitOfWork;
use crate::store::UserStore;

/// Columns of a user row, shared by every user query.
const USER_COLUMNS: &str = "id, username, email, password_hash, is_active, is_superuser, created_at";

/// One row per (user, role, permission) triple; role and permission columns
/// are NULL when the user has no roles or the role has no permissions.
const USER_WITH_ROLES_SELECT: &str = "\
    SELECT u.id, u.username, u.email, u.password_hash, u.is_active, u.is_superuser, u.created_at, \
           r.id AS role_id, r.name AS role_name, r.description AS role_description, \
           p.id AS permission_id, p.name AS permission_name, \
           p.resource AS permission_resource, p.action AS permission_action \
    FROM users u \
    LEFT JOIN user_roles ur ON ur.user_id = u.id \
    LEFT JOIN roles r ON r.id = ur.role_id \
    LEFT JOIN role_permissions rp ON rp.role_id = r.id \
    LEFT JOIN permissions p ON p.id = rp.permission_id";

/// Flat row returned by [`USER_WITH_ROLES_SELECT`].
#[derive(Debug, Clone, FromRow)]
pub(crate) struct UserRoleRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    is_active: bool,
    is_superuser: bool,
    created_at: DateTime<Utc>,
    role_id: Option<i64>,
    role_name: Option<String>,
    role_description: Option<String>,
    permission_id: Option<i64>,
    permission_name: Option<String>,
    permission_resource: Option<String>,
    permission_action: Option<String>,
}

/// Fold joined rows (ordered by role name) into a single user with roles.
pub(crate) fn fold_user_rows(rows: Vec<UserRoleRow>) -> Option<UserWithRoles> {
    let first = rows.first()?;
    let user = User {
        id: first.id,
        username: first.username.clone(),
        email: first.email.clone(),
        password_hash: first.password_hash.clone(),
        is_active: first.is_active,
        is_superuser: first.is_superuser,
        created_at: first.created_at,
    };

    let mut roles: Vec<RoleWithPermissions> = Vec::new();
    for row in rows {
        let (Some(role_id), Some(role_name)) = (row.role_id, row.role_name) else {
            continue;
        };

        if roles.last().map(|r| r.role.id) != Some(role_id) {
            roles.push(RoleWithPermissions {
                role: Role {
                    id: role_id,
                    name: role_name,
                    description: row.role_description,
                },
                permissions: Vec::new(),
            });
        }

        if let (Some(permission_id), Some(permission_name), Some(current)) =
            (row.permission_id, row.permission_name, roles.last_mut())
        {
            current.permissions.push(Permission {
                id: permission_id,
                name: permission_name,
                resource: row.permission_resource,
                action: row.permission_action,
            });
        }
    }

    Some(UserWithRoles { user, roles })
}

#[async_trait]
impl UserStore for PgUnitOfWork {
    async fn create_user(&mut self, data: &NewUser) -> AppResult<User> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&data.username)
            .bind(&data.email)
            .bind(&data.password_hash)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| {
                let err = map_sqlx_error("Failed to create user", e);
                if err.kind == ErrorKind::Conflict {
                    AppError::conflict("Username or email already exists.")
                } else {
                    err
                }
            })
    }

    async fn load_user_with_roles(&mut self, id: i64) -> AppResult<Option<UserWithRoles>> {
        let sql = format!("{USER_WITH_ROLES_SELECT} WHERE u.id = $1 ORDER BY r.name, p.name");

        let rows = sqlx::query_as::<_, UserRoleRow>(&sql)
            .bind(id)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to load user with roles", e))?;

        Ok(fold_user_rows(rows))
    }

    async fn load_user_by_username(
        &mut self,
        username: &str,
    ) -> AppResult<Option<UserWithRoles>> {
        let sql =
            format!("{USER_WITH_ROLES_SELECT} WHERE u.username = $1 ORDER BY r.name, p.name");

        let rows = sqlx::query_as::<_, UserRoleRow>(&sql)
            .bind(username)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to load user by username", e))?;

        Ok(fold_user_rows(rows))
    }

    async fn set_user_active(&mut self, id: i64, active: bool) -> AppResult<bool> {
        let result = sqlx::query("UPDATE users SET is_active = $2 WHERE id = $1")
            .bind(id)
            .bind(active)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to update user status", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&mut self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to delete user", e))?;

        Ok(result.rows_affected() > 0)
    }
}
