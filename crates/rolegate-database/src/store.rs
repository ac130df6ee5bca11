//! Store traits consumed by the auth core.
//!
//! Every store access happens inside a [`UnitOfWork`] obtained from
//! [`AuthStore::begin`]. Writes become visible to other units only on
//! [`UnitOfWork::commit`]; dropping a unit without committing discards
//! everything it wrote.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use rolegate_core::result::AppResult;
use rolegate_entity::role::{NewPermission, NewRole, Permission, Role};
use rolegate_entity::token::{NewRefreshToken, RefreshToken};
use rolegate_entity::user::{NewUser, User, UserWithRoles};

/// Entry point to the backing store.
#[async_trait]
pub trait AuthStore: Send + Sync + 'static {
    /// Open a new unit of work.
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;

    /// Check that the store is reachable.
    async fn ping(&self) -> AppResult<()>;
}

/// A scoped, atomic set of store operations.
#[async_trait]
pub trait UnitOfWork: UserStore + RefreshTokenStore + RoleGraphStore {
    /// Make every write performed through this unit visible atomically.
    async fn commit(self: Box<Self>) -> AppResult<()>;
}

/// User record access.
#[async_trait]
pub trait UserStore: Send {
    /// Insert a user. Fails with `Conflict` when the username or email is taken.
    async fn create_user(&mut self, data: &NewUser) -> AppResult<User>;

    /// Load a user with roles and permissions fully populated.
    async fn load_user_with_roles(&mut self, id: i64) -> AppResult<Option<UserWithRoles>>;

    /// Load a user by exact (case-sensitive) username, roles populated.
    async fn load_user_by_username(&mut self, username: &str)
    -> AppResult<Option<UserWithRoles>>;

    /// Enable or disable a user. Returns `false` if no such user exists.
    async fn set_user_active(&mut self, id: i64, active: bool) -> AppResult<bool>;

    /// Delete a user, cascading to role links and refresh tokens.
    async fn delete_user(&mut self, id: i64) -> AppResult<bool>;
}

/// Refresh token ledger.
#[async_trait]
pub trait RefreshTokenStore: Send {
    /// Persist a newly issued refresh token with `revoked = false`.
    async fn issue_refresh_token(&mut self, data: &NewRefreshToken) -> AppResult<RefreshToken>;

    /// Look up a token by its raw string. The row stays locked for the
    /// remainder of the unit of work.
    async fn lookup_refresh_token(&mut self, token: &str) -> AppResult<Option<RefreshToken>>;

    /// Mark a token revoked. Idempotent; returns `false` for unknown tokens.
    async fn revoke_refresh_token(&mut self, token: &str) -> AppResult<bool>;

    /// Revoke every live token owned by a user. Returns the number revoked.
    async fn revoke_user_refresh_tokens(&mut self, user_id: i64) -> AppResult<u64>;

    /// Delete rows that are revoked or expired as of `now`.
    async fn purge_refresh_tokens(&mut self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// Role and permission graph.
#[async_trait]
pub trait RoleGraphStore: Send {
    /// Find a role by exact name.
    async fn find_role_by_name(&mut self, name: &str) -> AppResult<Option<Role>>;

    /// Attach a role to a user. Idempotent.
    async fn assign_role(&mut self, user_id: i64, role_id: i64) -> AppResult<()>;

    /// Insert a permission, or update resource/action if the name exists.
    async fn upsert_permission(&mut self, data: &NewPermission) -> AppResult<Permission>;

    /// Insert a role, or update its description if the name exists.
    async fn upsert_role(&mut self, data: &NewRole) -> AppResult<Role>;

    /// Replace the permission set granted by a role.
    async fn set_role_permissions(&mut self, role_id: i64, permission_ids: &[i64])
    -> AppResult<()>;
}

/// Hex-encoded SHA-256 fingerprint under which a refresh token is stored.
pub fn token_fingerprint(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable_hex() {
        let a = token_fingerprint("header.payload.signature");
        let b = token_fingerprint("header.payload.signature");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, token_fingerprint("header.payload.signaturf"));
    }
}
