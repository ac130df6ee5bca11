//! Application state shared across all handlers and extractors.

use std::sync::Arc;

use rolegate_auth::{AuthenticationService, RbacEnforcer, SessionResolver};
use rolegate_core::config::AuthConfig;
use rolegate_core::result::AppResult;
use rolegate_database::store::AuthStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Backing store, used directly by health checks.
    pub store: Arc<dyn AuthStore>,
    /// Register/login/refresh/logout flows.
    pub auth_service: Arc<AuthenticationService>,
    /// Bearer token resolution.
    pub session_resolver: Arc<SessionResolver>,
    /// Permission checks.
    pub rbac_enforcer: Arc<RbacEnforcer>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("auth_service", &self.auth_service)
            .finish()
    }
}

impl AppState {
    /// Wires the auth components over `store` using `config`.
    pub fn new(store: Arc<dyn AuthStore>, config: &AuthConfig) -> AppResult<Self> {
        let auth_service = AuthenticationService::from_config(Arc::clone(&store), config)?;
        let session_resolver = SessionResolver::new(Arc::clone(&store), auth_service.codec());

        Ok(Self {
            store,
            auth_service: Arc::new(auth_service),
            session_resolver: Arc::new(session_resolver),
            rbac_enforcer: Arc::new(RbacEnforcer::new()),
        })
    }
}
