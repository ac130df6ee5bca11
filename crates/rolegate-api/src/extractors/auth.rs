//! `AuthUser` extractor: pulls the bearer token from the Authorization
//! header and resolves it to an active user.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use rolegate_core::error::AppError;
use rolegate_entity::user::UserWithRoles;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller, with roles and permissions preloaded.
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserWithRoles);

impl std::ops::Deref for AuthUser {
    type Target = UserWithRoles;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` value.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(AppError::unauthenticated)?;
        let user = state.session_resolver.resolve(token).await?;
        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/users/me");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&parts(Some("Bearer abc.def"))), Some("abc.def"));
        assert_eq!(bearer_token(&parts(Some("bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&parts(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&parts(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts(None)), None);
    }
}
