//! Role graph queries: role lookup, assignment, and catalogue upserts.

use async_trait::async_trait;

use rolegate_core::result::AppResult;
use rolegate_entity::role::{NewPermission, NewRole, Permission, Role};

use crate::error::map_sqlx_error;
use crate::postgres::PgUnitOfWork;
use crate::store::RoleGraphStore;

#[async_trait]
impl RoleGraphStore for PgUnitOfWork {
    async fn find_role_by_name(&mut self, name: &str) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT id, name, description FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to find role", e))
    }

    async fn assign_role(&mut self, user_id: i64, role_id: i64) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to assign role", e))?;

        Ok(())
    }

    async fn upsert_permission(&mut self, data: &NewPermission) -> AppResult<Permission> {
        sqlx::query_as::<_, Permission>(
            "INSERT INTO permissions (name, resource, action) VALUES ($1, $2, $3) \
             ON CONFLICT (name) DO UPDATE SET resource = EXCLUDED.resource, action = EXCLUDED.action \
             RETURNING id, name, resource, action",
        )
        .bind(&data.name)
        .bind(&data.resource)
        .bind(&data.action)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to upsert permission", e))
    }

    async fn upsert_role(&mut self, data: &NewRole) -> AppResult<Role> {
        sqlx::query_as::<_, Role>(
            "INSERT INTO roles (name, description) VALUES ($1, $2) \
             ON CONFLICT (name) DO UPDATE SET description = COALESCE(EXCLUDED.description, roles.description) \
             RETURNING id, name, description",
        )
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to upsert role", e))
    }

    async fn set_role_permissions(
        &mut self,
        role_id: i64,
        permission_ids: &[i64],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(role_id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to clear role permissions", e))?;

        sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id) \
             SELECT $1, UNNEST($2::BIGINT[]) ON CONFLICT DO NOTHING",
        )
        .bind(role_id)
        .bind(permission_ids)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to grant role permissions", e))?;

        Ok(())
    }
}
