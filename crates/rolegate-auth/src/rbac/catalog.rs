//! Default role and permission catalogue installed by `rolegate-cli seed`.

use std::collections::HashMap;

use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_database::store::{RoleGraphStore, UnitOfWork};
use rolegate_entity::role::{NewPermission, NewRole};

/// A permission in the default catalogue.
#[derive(Debug, Clone, Copy)]
pub struct PermissionSpec {
    pub name: &'static str,
    pub resource: &'static str,
    pub action: &'static str,
}

/// A role in the default catalogue with the permission names it grants.
#[derive(Debug, Clone, Copy)]
pub struct RoleSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub permissions: &'static [&'static str],
}

pub const DEFAULT_PERMISSIONS: &[PermissionSpec] = &[
    PermissionSpec { name: "create_article", resource: "article", action: "create" },
    PermissionSpec { name: "read_article", resource: "article", action: "read" },
    PermissionSpec { name: "update_article", resource: "article", action: "update" },
    PermissionSpec { name: "delete_article", resource: "article", action: "delete" },
    PermissionSpec { name: "read_user", resource: "user", action: "read" },
    PermissionSpec { name: "update_user", resource: "user", action: "update" },
    PermissionSpec { name: "delete_user", resource: "user", action: "delete" },
];

pub const DEFAULT_ROLES: &[RoleSpec] = &[
    RoleSpec {
        name: "viewer",
        description: "Read-only access",
        permissions: &["read_article", "read_user"],
    },
    RoleSpec {
        name: "editor",
        description: "Can create and edit articles",
        permissions: &["read_article", "read_user", "create_article", "update_article"],
    },
    RoleSpec {
        name: "admin",
        description: "Full access",
        permissions: &[
            "create_article",
            "read_article",
            "update_article",
            "delete_article",
            "read_user",
            "update_user",
            "delete_user",
        ],
    },
];

/// Counts reported after seeding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub permissions: usize,
    pub roles: usize,
}

/// Upserts the default catalogue inside `uow`. Running it again converges
/// every role to exactly the listed permission set.
pub async fn seed_default_catalog(uow: &mut dyn UnitOfWork) -> AppResult<SeedReport> {
    let mut ids: HashMap<&str, i64> = HashMap::new();
    for spec in DEFAULT_PERMISSIONS {
        let permission = uow
            .upsert_permission(&NewPermission {
                name: spec.name.to_string(),
                resource: Some(spec.resource.to_string()),
                action: Some(spec.action.to_string()),
            })
            .await?;
        ids.insert(spec.name, permission.id);
    }

    for spec in DEFAULT_ROLES {
        let role = uow
            .upsert_role(&NewRole {
                name: spec.name.to_string(),
                description: Some(spec.description.to_string()),
            })
            .await?;

        let permission_ids = spec
            .permissions
            .iter()
            .map(|name| {
                ids.get(name).copied().ok_or_else(|| {
                    AppError::internal(format!("Role '{}' grants unknown permission '{name}'", spec.name))
                })
            })
            .collect::<AppResult<Vec<i64>>>()?;

        uow.set_role_permissions(role.id, &permission_ids).await?;
        tracing::debug!(role = spec.name, permissions = permission_ids.len(), "Seeded role");
    }

    Ok(SeedReport {
        permissions: DEFAULT_PERMISSIONS.len(),
        roles: DEFAULT_ROLES.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolegate_database::MemoryAuthStore;
    use rolegate_database::store::{AuthStore, UserStore};
    use rolegate_entity::user::NewUser;

    #[test]
    fn test_roles_reference_known_permissions() {
        for role in DEFAULT_ROLES {
            for name in role.permissions {
                assert!(
                    DEFAULT_PERMISSIONS.iter().any(|p| p.name == *name),
                    "{} grants unknown permission {name}",
                    role.name
                );
            }
        }
    }

    #[test]
    fn test_admin_holds_everything() {
        let admin = DEFAULT_ROLES.iter().find(|r| r.name == "admin").unwrap();
        assert_eq!(admin.permissions.len(), DEFAULT_PERMISSIONS.len());
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = MemoryAuthStore::new();
        for _ in 0..2 {
            let mut uow = store.begin().await.unwrap();
            let report = seed_default_catalog(uow.as_mut()).await.unwrap();
            assert_eq!(report.roles, 3);
            uow.commit().await.unwrap();
        }

        let mut uow = store.begin().await.unwrap();
        let editor = uow.find_role_by_name("editor").await.unwrap().unwrap();
        let user = uow
            .create_user(&NewUser {
                username: "ed".to_string(),
                email: "ed@example.com".to_string(),
                password_hash: String::new(),
            })
            .await
            .unwrap();
        uow.assign_role(user.id, editor.id).await.unwrap();

        let loaded = uow.load_user_with_roles(user.id).await.unwrap().unwrap();
        assert_eq!(loaded.roles[0].permissions.len(), 4);
    }
}
