//! User administration commands.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use rolegate_auth::rbac::roles_of;
use rolegate_core::error::AppError;
use rolegate_database::store::{
    AuthStore, RefreshTokenStore, RoleGraphStore, UnitOfWork, UserStore,
};
use rolegate_entity::user::UserWithRoles;

use crate::output::{self, OutputFormat};

/// Arguments for `assign-role`
#[derive(Debug, Args)]
pub struct AssignRoleArgs {
    /// Username (exact, case-sensitive)
    pub username: String,
    /// Role name
    pub role: String,
}

/// Arguments for `set-active`
#[derive(Debug, Args)]
pub struct SetActiveArgs {
    /// Username (exact, case-sensitive)
    pub username: String,
    /// `true` to enable, `false` to disable
    #[arg(long, action = clap::ArgAction::Set)]
    pub active: bool,
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    active: bool,
    roles: String,
}

impl From<&UserWithRoles> for UserRow {
    fn from(u: &UserWithRoles) -> Self {
        Self {
            id: u.user.id,
            username: u.user.username.clone(),
            email: u.user.email.clone(),
            active: u.user.is_active,
            roles: roles_of(u).join(", "),
        }
    }
}

/// Attach a role to a user. Idempotent.
pub async fn assign_role(
    store: &dyn AuthStore,
    args: &AssignRoleArgs,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut uow = store.begin().await?;

    let user = uow
        .load_user_by_username(&args.username)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User '{}' not found", args.username)))?;
    let role = uow
        .find_role_by_name(&args.role)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Role '{}' not found", args.role)))?;

    uow.assign_role(user.id(), role.id).await?;
    let user = uow
        .load_user_with_roles(user.id())
        .await?
        .ok_or_else(|| AppError::internal("User disappeared while assigning role"))?;
    uow.commit().await?;

    tracing::info!(user_id = user.id(), role = %args.role, "Role assigned");
    output::print_list(&[UserRow::from(&user)], format);
    output::print_success(&format!("Assigned role '{}' to '{}'.", args.role, args.username));
    Ok(())
}

/// Enable or disable a user. Disabling also revokes every live refresh token.
pub async fn set_active(
    store: &dyn AuthStore,
    args: &SetActiveArgs,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut uow = store.begin().await?;

    let user = uow
        .load_user_by_username(&args.username)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User '{}' not found", args.username)))?;

    uow.set_user_active(user.id(), args.active).await?;
    let revoked = if args.active {
        0
    } else {
        uow.revoke_user_refresh_tokens(user.id()).await?
    };

    let user = uow
        .load_user_with_roles(user.id())
        .await?
        .ok_or_else(|| AppError::internal("User disappeared while updating status"))?;
    uow.commit().await?;

    tracing::info!(user_id = user.id(), active = args.active, revoked, "User status changed");
    output::print_list(&[UserRow::from(&user)], format);
    if args.active {
        output::print_success(&format!("Enabled '{}'.", args.username));
    } else {
        output::print_success(&format!(
            "Disabled '{}' and revoked {revoked} refresh token(s).",
            args.username
        ));
    }
    Ok(())
}
