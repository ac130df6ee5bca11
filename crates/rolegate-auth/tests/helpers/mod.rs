//! Shared helpers for auth integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use rolegate_auth::rbac::seed_default_catalog;
use rolegate_auth::{AuthenticationService, SessionResolver, TokenCodec};
use rolegate_core::config::AuthConfig;
use rolegate_database::MemoryAuthStore;
use chrono::{DateTime, Utc};
use rolegate_database::store::{
    AuthStore, RefreshTokenStore, RoleGraphStore, UnitOfWork, UserStore,
};
use rolegate_entity::token::{NewRefreshToken, RefreshToken};

pub const SECRET: &str = "integration-test-secret";

/// Test context wired to an in-memory store.
pub struct TestAuth {
    pub store: MemoryAuthStore,
    pub service: AuthenticationService,
    pub resolver: SessionResolver,
    pub codec: Arc<TokenCodec>,
}

/// Auth configuration with Argon2 cost lowered for fast tests.
pub fn test_config() -> AuthConfig {
    let mut config = AuthConfig::with_secret(SECRET);
    config.argon2_memory_kib = 1024;
    config.argon2_iterations = 1;
    config
}

impl TestAuth {
    /// Store seeded with the default catalogue.
    pub async fn new() -> Self {
        let ctx = Self::unseeded();
        let mut uow = ctx.store.begin().await.unwrap();
        seed_default_catalog(uow.as_mut()).await.unwrap();
        uow.commit().await.unwrap();
        ctx
    }

    /// Empty store: no roles, no permissions.
    pub fn unseeded() -> Self {
        let store = MemoryAuthStore::new();
        let shared: Arc<dyn AuthStore> = Arc::new(store.clone());
        let service = AuthenticationService::from_config(Arc::clone(&shared), &test_config())
            .unwrap();
        let codec = service.codec();
        let resolver = SessionResolver::new(shared, Arc::clone(&codec));

        Self {
            store,
            service,
            resolver,
            codec,
        }
    }

    /// Enables or disables a user by id.
    pub async fn set_active(&self, user_id: i64, active: bool) {
        let mut uow = self.store.begin().await.unwrap();
        assert!(uow.set_user_active(user_id, active).await.unwrap());
        uow.commit().await.unwrap();
    }

    /// Attaches a role to a user by role name.
    pub async fn grant_role(&self, user_id: i64, role: &str) {
        let mut uow = self.store.begin().await.unwrap();
        let role = uow.find_role_by_name(role).await.unwrap().unwrap();
        uow.assign_role(user_id, role.id).await.unwrap();
        uow.commit().await.unwrap();
    }

    /// Loads a user with roles, outside any flow.
    pub async fn load(&self, user_id: i64) -> Option<rolegate_entity::user::UserWithRoles> {
        let mut uow = self.store.begin().await.unwrap();
        uow.load_user_with_roles(user_id).await.unwrap()
    }

    /// Writes a ledger row for `token` directly, bypassing the service.
    pub async fn record_refresh(&self, token: &str, user_id: i64, expires_at: DateTime<Utc>) {
        let mut uow = self.store.begin().await.unwrap();
        uow.issue_refresh_token(&NewRefreshToken {
            token: token.to_string(),
            user_id,
            expires_at,
        })
        .await
        .unwrap();
        uow.commit().await.unwrap();
    }

    /// Looks up the ledger row for a raw refresh token.
    pub async fn ledger_row(&self, token: &str) -> Option<RefreshToken> {
        let mut uow = self.store.begin().await.unwrap();
        uow.lookup_refresh_token(token).await.unwrap()
    }
}
