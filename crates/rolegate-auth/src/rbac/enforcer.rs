//! Permission enforcement for resolved users.

use rolegate_core::error::AppError;
use rolegate_entity::user::UserWithRoles;

/// Checks whether a user holds a named permission through any of its roles.
#[derive(Debug, Clone, Copy, Default)]
pub struct RbacEnforcer;

impl RbacEnforcer {
    /// Creates a new enforcer.
    pub fn new() -> Self {
        Self
    }

    /// Returns whether `user` holds `permission`. Superusers hold every
    /// permission.
    pub fn has_permission(&self, user: &UserWithRoles, permission: &str) -> bool {
        user.user.is_superuser
            || user
                .roles
                .iter()
                .flat_map(|r| r.permissions.iter())
                .any(|p| p.name == permission)
    }

    /// Returns `Ok(())` if allowed, or a `Forbidden` error if denied.
    pub fn require_permission(&self, user: &UserWithRoles, permission: &str) -> Result<(), AppError> {
        if self.has_permission(user, permission) {
            Ok(())
        } else {
            tracing::warn!(
                user_id = user.id(),
                permission,
                "Permission denied"
            );
            Err(AppError::forbidden(format!(
                "Missing required permission '{permission}'"
            )))
        }
    }
}
