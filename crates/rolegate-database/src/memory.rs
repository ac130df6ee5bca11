//! In-memory store with the same unit-of-work semantics as PostgreSQL.
//!
//! A unit of work holds the store lock for its whole lifetime and writes
//! to a private copy of the state; commit swaps the copy in. Units are
//! therefore fully serialized and an uncommitted unit leaves no trace.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_entity::role::{NewPermission, NewRole, Permission, Role, RoleWithPermissions};
use rolegate_entity::token::{NewRefreshToken, RefreshToken};
use rolegate_entity::user::{NewUser, User, UserWithRoles};

use crate::store::{
    AuthStore, RefreshTokenStore, RoleGraphStore, UnitOfWork, UserStore, token_fingerprint,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    last_id: i64,
    users: BTreeMap<i64, User>,
    roles: BTreeMap<i64, Role>,
    permissions: BTreeMap<i64, Permission>,
    /// (user_id, role_id)
    user_roles: BTreeSet<(i64, i64)>,
    /// (role_id, permission_id)
    role_permissions: BTreeSet<(i64, i64)>,
    /// Keyed by token fingerprint.
    refresh_tokens: BTreeMap<String, RefreshToken>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    /// Assemble a user with roles ordered by name and permissions ordered
    /// by name, mirroring the joined query's ordering.
    fn with_roles(&self, user: &User) -> UserWithRoles {
        let mut roles: Vec<RoleWithPermissions> = self
            .user_roles
            .iter()
            .filter(|(user_id, _)| *user_id == user.id)
            .filter_map(|(_, role_id)| self.roles.get(role_id))
            .map(|role| {
                let mut permissions: Vec<Permission> = self
                    .role_permissions
                    .iter()
                    .filter(|(role_id, _)| *role_id == role.id)
                    .filter_map(|(_, permission_id)| self.permissions.get(permission_id))
                    .cloned()
                    .collect();
                permissions.sort_by(|a, b| a.name.cmp(&b.name));

                RoleWithPermissions {
                    role: role.clone(),
                    permissions,
                }
            })
            .collect();
        roles.sort_by(|a, b| a.role.name.cmp(&b.role.name));

        UserWithRoles {
            user: user.clone(),
            roles,
        }
    }
}

/// Thread-safe in-memory [`AuthStore`] for tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuthStore {
    state: Arc<Mutex<MemoryState>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryAuthStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: while set, `begin` and `ping` fail with
    /// `ServiceUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of committed refresh token rows, revoked or not.
    pub async fn refresh_token_count(&self) -> usize {
        self.state.lock().await.refresh_tokens.len()
    }

    /// Number of committed user rows.
    pub async fn user_count(&self) -> usize {
        self.state.lock().await.users.len()
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::service_unavailable("In-memory store is unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthStore for MemoryAuthStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        self.check_available()?;
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryUnitOfWork { guard, staged }))
    }

    async fn ping(&self) -> AppResult<()> {
        self.check_available()
    }
}

/// Unit of work over [`MemoryAuthStore`].
struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryUnitOfWork { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUnitOfWork {
    async fn create_user(&mut self, data: &NewUser) -> AppResult<User> {
        let taken = self
            .staged
            .users
            .values()
            .any(|u| u.username == data.username || u.email == data.email);
        if taken {
            return Err(AppError::conflict("Username or email already exists."));
        }

        let user = User {
            id: self.staged.next_id(),
            username: data.username.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            is_active: true,
            is_superuser: false,
            created_at: Utc::now(),
        };
        self.staged.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn load_user_with_roles(&mut self, id: i64) -> AppResult<Option<UserWithRoles>> {
        Ok(self
            .staged
            .users
            .get(&id)
            .map(|user| self.staged.with_roles(user)))
    }

    async fn load_user_by_username(
        &mut self,
        username: &str,
    ) -> AppResult<Option<UserWithRoles>> {
        Ok(self
            .staged
            .users
            .values()
            .find(|u| u.username == username)
            .map(|user| self.staged.with_roles(user)))
    }

    async fn set_user_active(&mut self, id: i64, active: bool) -> AppResult<bool> {
        Ok(match self.staged.users.get_mut(&id) {
            Some(user) => {
                user.is_active = active;
                true
            }
            None => false,
        })
    }

    async fn delete_user(&mut self, id: i64) -> AppResult<bool> {
        if self.staged.users.remove(&id).is_none() {
            return Ok(false);
        }
        self.staged.user_roles.retain(|(user_id, _)| *user_id != id);
        self.staged.refresh_tokens.retain(|_, t| t.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryUnitOfWork {
    async fn issue_refresh_token(&mut self, data: &NewRefreshToken) -> AppResult<RefreshToken> {
        let token_hash = token_fingerprint(&data.token);
        if self.staged.refresh_tokens.contains_key(&token_hash) {
            return Err(AppError::conflict("Refresh token already exists."));
        }
        if !self.staged.users.contains_key(&data.user_id) {
            return Err(AppError::not_found(format!(
                "User {} does not exist",
                data.user_id
            )));
        }

        let record = RefreshToken {
            id: self.staged.next_id(),
            token_hash: token_hash.clone(),
            user_id: data.user_id,
            expires_at: data.expires_at,
            revoked: false,
            created_at: Utc::now(),
        };
        self.staged.refresh_tokens.insert(token_hash, record.clone());
        Ok(record)
    }

    async fn lookup_refresh_token(&mut self, token: &str) -> AppResult<Option<RefreshToken>> {
        Ok(self
            .staged
            .refresh_tokens
            .get(&token_fingerprint(token))
            .cloned())
    }

    async fn revoke_refresh_token(&mut self, token: &str) -> AppResult<bool> {
        Ok(
            match self.staged.refresh_tokens.get_mut(&token_fingerprint(token)) {
                Some(record) => {
                    record.revoked = true;
                    true
                }
                None => false,
            },
        )
    }

    async fn revoke_user_refresh_tokens(&mut self, user_id: i64) -> AppResult<u64> {
        let now = Utc::now();
        let mut revoked = 0u64;
        for record in self.staged.refresh_tokens.values_mut() {
            if record.user_id == user_id && record.is_valid_at(now) {
                record.revoked = true;
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn purge_refresh_tokens(&mut self, now: DateTime<Utc>) -> AppResult<u64> {
        let before = self.staged.refresh_tokens.len();
        self.staged
            .refresh_tokens
            .retain(|_, record| record.is_valid_at(now));
        Ok((before - self.staged.refresh_tokens.len()) as u64)
    }
}

#[async_trait]
impl RoleGraphStore for MemoryUnitOfWork {
    async fn find_role_by_name(&mut self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .staged
            .roles
            .values()
            .find(|r| r.name == name)
            .cloned())
    }

    async fn assign_role(&mut self, user_id: i64, role_id: i64) -> AppResult<()> {
        if !self.staged.users.contains_key(&user_id) || !self.staged.roles.contains_key(&role_id) {
            return Err(AppError::not_found("User or role does not exist"));
        }
        self.staged.user_roles.insert((user_id, role_id));
        Ok(())
    }

    async fn upsert_permission(&mut self, data: &NewPermission) -> AppResult<Permission> {
        let existing = self
            .staged
            .permissions
            .values()
            .find(|p| p.name == data.name)
            .map(|p| p.id);
        let id = match existing {
            Some(id) => id,
            None => self.staged.next_id(),
        };

        let permission = Permission {
            id,
            name: data.name.clone(),
            resource: data.resource.clone(),
            action: data.action.clone(),
        };
        self.staged.permissions.insert(id, permission.clone());
        Ok(permission)
    }

    async fn upsert_role(&mut self, data: &NewRole) -> AppResult<Role> {
        let existing = self
            .staged
            .roles
            .values()
            .find(|r| r.name == data.name)
            .cloned();

        let role = match existing {
            Some(mut role) => {
                if data.description.is_some() {
                    role.description = data.description.clone();
                }
                role
            }
            None => Role {
                id: self.staged.next_id(),
                name: data.name.clone(),
                description: data.description.clone(),
            },
        };
        self.staged.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn set_role_permissions(
        &mut self,
        role_id: i64,
        permission_ids: &[i64],
    ) -> AppResult<()> {
        if let Some(missing) = permission_ids
            .iter()
            .find(|id| !self.staged.permissions.contains_key(id))
        {
            return Err(AppError::not_found(format!(
                "Permission {missing} does not exist"
            )));
        }

        self.staged.role_permissions.retain(|(r, _)| *r != role_id);
        for permission_id in permission_ids {
            self.staged.role_permissions.insert((role_id, *permission_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rolegate_core::error::ErrorKind;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_uncommitted_unit_leaves_no_trace() {
        let store = MemoryAuthStore::new();
        {
            let mut uow = store.begin().await.unwrap();
            uow.create_user(&new_user("alice", "alice@example.com"))
                .await
                .unwrap();
        }
        assert_eq!(store.user_count().await, 0);

        let mut uow = store.begin().await.unwrap();
        uow.create_user(&new_user("alice", "alice@example.com"))
            .await
            .unwrap();
        uow.commit().await.unwrap();
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryAuthStore::new();
        let mut uow = store.begin().await.unwrap();
        uow.create_user(&new_user("alice", "alice@example.com"))
            .await
            .unwrap();
        let err = uow
            .create_user(&new_user("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        // Usernames are case-sensitive.
        uow.create_user(&new_user("Alice", "third@example.com"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_roles_and_permissions_are_loaded_sorted() {
        let store = MemoryAuthStore::new();
        let mut uow = store.begin().await.unwrap();
        let user = uow
            .create_user(&new_user("bob", "bob@example.com"))
            .await
            .unwrap();

        let read = uow
            .upsert_permission(&NewPermission {
                name: "read_user".to_string(),
                resource: Some("user".to_string()),
                action: Some("read".to_string()),
            })
            .await
            .unwrap();
        let article = uow
            .upsert_permission(&NewPermission {
                name: "read_article".to_string(),
                resource: Some("article".to_string()),
                action: Some("read".to_string()),
            })
            .await
            .unwrap();
        let viewer = uow
            .upsert_role(&NewRole {
                name: "viewer".to_string(),
                description: None,
            })
            .await
            .unwrap();
        uow.set_role_permissions(viewer.id, &[read.id, article.id])
            .await
            .unwrap();
        uow.assign_role(user.id, viewer.id).await.unwrap();
        uow.assign_role(user.id, viewer.id).await.unwrap();

        let loaded = uow.load_user_with_roles(user.id).await.unwrap().unwrap();
        assert_eq!(loaded.roles.len(), 1);
        let names: Vec<&str> = loaded.roles[0]
            .permissions
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["read_article", "read_user"]);
    }

    #[tokio::test]
    async fn test_refresh_token_ledger() {
        let store = MemoryAuthStore::new();
        let mut uow = store.begin().await.unwrap();
        let user = uow
            .create_user(&new_user("carol", "carol@example.com"))
            .await
            .unwrap();

        let now = Utc::now();
        uow.issue_refresh_token(&NewRefreshToken {
            token: "live".to_string(),
            user_id: user.id,
            expires_at: now + Duration::days(7),
        })
        .await
        .unwrap();
        uow.issue_refresh_token(&NewRefreshToken {
            token: "stale".to_string(),
            user_id: user.id,
            expires_at: now - Duration::minutes(1),
        })
        .await
        .unwrap();

        let live = uow.lookup_refresh_token("live").await.unwrap().unwrap();
        assert!(live.is_valid_at(now));
        assert!(uow.lookup_refresh_token("missing").await.unwrap().is_none());

        assert!(uow.revoke_refresh_token("live").await.unwrap());
        assert!(uow.revoke_refresh_token("live").await.unwrap());
        assert!(!uow.revoke_refresh_token("missing").await.unwrap());

        assert_eq!(uow.purge_refresh_tokens(now).await.unwrap(), 2);
        uow.commit().await.unwrap();
        assert_eq!(store.refresh_token_count().await, 0);
    }

    #[tokio::test]
    async fn test_delete_user_cascades_tokens() {
        let store = MemoryAuthStore::new();
        let mut uow = store.begin().await.unwrap();
        let user = uow
            .create_user(&new_user("dave", "dave@example.com"))
            .await
            .unwrap();
        uow.issue_refresh_token(&NewRefreshToken {
            token: "t".to_string(),
            user_id: user.id,
            expires_at: Utc::now() + Duration::days(1),
        })
        .await
        .unwrap();

        assert!(uow.delete_user(user.id).await.unwrap());
        assert!(uow.lookup_refresh_token("t").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unavailable_store_is_retryable() {
        let store = MemoryAuthStore::new();
        store.set_unavailable(true);
        let err = store.begin().await.err().unwrap();
        assert!(err.is_retryable());
        assert!(store.ping().await.is_err());

        store.set_unavailable(false);
        assert!(store.ping().await.is_ok());
    }
}
