//! Register, login, refresh, and logout flows.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use rolegate_core::config::AuthConfig;
use rolegate_core::error::{AppError, ErrorKind};
use rolegate_core::result::AppResult;
use rolegate_database::store::{
    AuthStore, RefreshTokenStore, RoleGraphStore, UnitOfWork, UserStore,
};
use rolegate_entity::token::NewRefreshToken;
use rolegate_entity::user::{NewUser, UserWithRoles};

use crate::jwt::{IssuedPair, TokenCodec, TokenKind, TokenPair};
use crate::password::PasswordHasher;

/// Result of a successful register or login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// The authenticated user with roles populated.
    pub user: UserWithRoles,
    /// Freshly issued token pair.
    pub tokens: TokenPair,
}

/// Orchestrates credential checks, token issuance, and refresh rotation.
#[derive(Clone)]
pub struct AuthenticationService {
    store: Arc<dyn AuthStore>,
    codec: Arc<TokenCodec>,
    hasher: Arc<PasswordHasher>,
    /// Role attached to every newly registered user.
    default_role: String,
}

impl std::fmt::Debug for AuthenticationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationService")
            .field("codec", &self.codec)
            .field("default_role", &self.default_role)
            .finish()
    }
}

impl AuthenticationService {
    /// Creates a service from pre-built components.
    pub fn new(
        store: Arc<dyn AuthStore>,
        codec: Arc<TokenCodec>,
        hasher: Arc<PasswordHasher>,
        default_role: impl Into<String>,
    ) -> Self {
        Self {
            store,
            codec,
            hasher,
            default_role: default_role.into(),
        }
    }

    /// Builds the codec and hasher from `config` and wires them to `store`.
    pub fn from_config(store: Arc<dyn AuthStore>, config: &AuthConfig) -> AppResult<Self> {
        let codec = Arc::new(TokenCodec::new(config)?);
        let hasher = Arc::new(PasswordHasher::new(config)?);
        Ok(Self::new(store, codec, hasher, config.default_role.clone()))
    }

    /// Returns the token codec shared with session resolution.
    pub fn codec(&self) -> Arc<TokenCodec> {
        Arc::clone(&self.codec)
    }

    /// Creates a user holding the default role and signs them in.
    ///
    /// The user row, its role link, and its first refresh token are
    /// committed together or not at all.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AppResult<AuthSession> {
        let password_hash = self
            .hasher
            .hash_password_blocking(password.to_string())
            .await?;

        let mut uow = self.store.begin().await?;

        let role = uow
            .find_role_by_name(&self.default_role)
            .await?
            .ok_or_else(|| {
                error!(role = %self.default_role, "Default role is missing");
                AppError::configuration(format!(
                    "Default role '{}' not found. Run the seed command.",
                    self.default_role
                ))
            })?;

        let user = uow
            .create_user(&NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await
            .inspect_err(|e| {
                if e.kind == ErrorKind::Conflict {
                    warn!(username, "Registration rejected: username or email taken");
                }
            })?;

        uow.assign_role(user.id, role.id).await?;

        let issued = self.codec.issue_pair(user.id)?;
        persist_refresh(uow.as_mut(), user.id, &issued).await?;

        let user = uow
            .load_user_with_roles(user.id)
            .await?
            .ok_or_else(|| AppError::internal("Registered user could not be reloaded"))?;

        uow.commit().await?;

        info!(user_id = user.id(), username, "User registered");

        Ok(AuthSession {
            user,
            tokens: issued.into_token_pair(),
        })
    }

    /// Exchanges a username and password for a token pair.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to the
    /// caller, both in the error returned and in the hashing work done.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AuthSession> {
        let found = {
            let mut uow = self.store.begin().await?;
            uow.load_user_by_username(username).await?
        };

        let stored_hash = found.as_ref().map(|u| u.user.password_hash.clone());
        let password_valid = self
            .hasher
            .verify_password_blocking(password.to_string(), stored_hash)
            .await?;

        let user = match found {
            Some(user) if password_valid => user,
            _ => {
                warn!(username, "Login rejected: invalid credentials");
                return Err(AppError::invalid_credentials());
            }
        };

        if !user.is_active() {
            warn!(user_id = user.id(), "Login rejected: account disabled");
            return Err(AppError::account_disabled());
        }

        let issued = self.codec.issue_pair(user.id())?;

        let mut uow = self.store.begin().await?;
        persist_refresh(uow.as_mut(), user.id(), &issued).await?;
        uow.commit().await?;

        info!(user_id = user.id(), "Login successful");

        Ok(AuthSession {
            user,
            tokens: issued.into_token_pair(),
        })
    }

    /// Rotates a refresh token: the presented token is revoked and a new
    /// pair is issued in the same unit of work.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = self.codec.decode(refresh_token, TokenKind::Refresh)?;
        let subject = claims.user_id()?;

        let mut uow = self.store.begin().await?;

        let record = uow
            .lookup_refresh_token(refresh_token)
            .await?
            .ok_or_else(|| AppError::invalid_token("Refresh token is not recognized"))?;

        if record.revoked {
            warn!(user_id = record.user_id, "Revoked refresh token presented");
            return Err(AppError::invalid_token("Refresh token has been revoked"));
        }
        if !record.is_valid_at(Utc::now()) {
            return Err(AppError::invalid_token("Refresh token has expired"));
        }
        if record.user_id != subject {
            warn!(
                user_id = record.user_id,
                subject, "Refresh token subject does not match its owner"
            );
            return Err(AppError::invalid_token("Refresh token is invalid"));
        }

        let user = uow
            .load_user_with_roles(record.user_id)
            .await?
            .ok_or_else(|| AppError::invalid_token("Token owner no longer exists"))?;

        if !user.is_active() {
            warn!(user_id = user.id(), "Refresh rejected: account disabled");
            return Err(AppError::account_disabled());
        }

        uow.revoke_refresh_token(refresh_token).await?;

        let issued = self.codec.issue_pair(user.id())?;
        persist_refresh(uow.as_mut(), user.id(), &issued).await?;

        uow.commit().await?;

        info!(user_id = user.id(), "Refresh token rotated");

        Ok(issued.into_token_pair())
    }

    /// Revokes a refresh token. Unknown or already revoked tokens are
    /// accepted silently.
    pub async fn logout(&self, refresh_token: &str) -> AppResult<()> {
        let mut uow = self.store.begin().await?;
        let revoked = uow.revoke_refresh_token(refresh_token).await?;
        uow.commit().await?;

        if revoked {
            info!("Refresh token revoked on logout");
        }
        Ok(())
    }
}

/// Persists the refresh half of `issued` for `user_id`.
async fn persist_refresh(
    uow: &mut dyn UnitOfWork,
    user_id: i64,
    issued: &IssuedPair,
) -> AppResult<()> {
    uow.issue_refresh_token(&NewRefreshToken {
        token: issued.refresh.token.clone(),
        user_id,
        expires_at: issued.refresh.expires_at,
    })
    .await?;
    Ok(())
}
