//! Bearer token to authenticated user resolution.

use std::sync::Arc;

use tracing::debug;

use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;
use rolegate_database::store::{AuthStore, UserStore};
use rolegate_entity::user::UserWithRoles;

use crate::jwt::{TokenCodec, TokenKind};

/// Resolves an access token to an active user with roles preloaded.
#[derive(Clone)]
pub struct SessionResolver {
    store: Arc<dyn AuthStore>,
    codec: Arc<TokenCodec>,
}

impl std::fmt::Debug for SessionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionResolver")
            .field("codec", &self.codec)
            .finish()
    }
}

impl SessionResolver {
    /// Creates a resolver over `store`, verifying tokens with `codec`.
    pub fn new(store: Arc<dyn AuthStore>, codec: Arc<TokenCodec>) -> Self {
        Self { store, codec }
    }

    /// Resolves `bearer` to its user.
    ///
    /// Any token problem, a missing user, or a disabled account yields
    /// `Unauthenticated`. Store failures are returned unchanged.
    pub async fn resolve(&self, bearer: &str) -> AppResult<UserWithRoles> {
        let user_id = self
            .codec
            .decode(bearer, TokenKind::Access)
            .and_then(|claims| claims.user_id())
            .map_err(|e| {
                debug!(error = %e, "Bearer token rejected");
                AppError::unauthenticated()
            })?;

        let user = {
            let mut uow = self.store.begin().await?;
            uow.load_user_with_roles(user_id).await?
        };

        match user {
            Some(user) if user.is_active() => Ok(user),
            Some(_) => {
                debug!(user_id, "Bearer token belongs to a disabled account");
                Err(AppError::unauthenticated())
            }
            None => {
                debug!(user_id, "Bearer token subject no longer exists");
                Err(AppError::unauthenticated())
            }
        }
    }
}
