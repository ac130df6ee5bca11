//! Token signing and verification with a symmetric secret.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rolegate_core::config::AuthConfig;
use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;

use super::claims::{Claims, TokenKind};

/// Token pair as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

/// A freshly signed token and when it stops being valid.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Encoded token string.
    pub token: String,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

/// Access and refresh tokens issued together.
#[derive(Debug, Clone)]
pub struct IssuedPair {
    /// The access token.
    pub access: IssuedToken,
    /// The refresh token; must be persisted before it is handed out.
    pub refresh: IssuedToken,
}

impl IssuedPair {
    /// Converts into the client-facing wire shape.
    pub fn into_token_pair(self) -> TokenPair {
        TokenPair {
            access_token: self.access.token,
            refresh_token: self.refresh.token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Signs and verifies access and refresh tokens.
///
/// Holds only immutable key material and is cheap to clone.
#[derive(Clone)]
pub struct TokenCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl TokenCodec {
    /// Builds a codec from validated auth configuration.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        config.validate()?;

        let algorithm = Algorithm::from_str(&config.jwt_algorithm).map_err(|_| {
            AppError::configuration(format!(
                "Unsupported signing algorithm '{}'",
                config.jwt_algorithm
            ))
        })?;

        let access_ttl = i64::try_from(config.access_ttl_minutes)
            .ok()
            .and_then(Duration::try_minutes)
            .ok_or_else(|| AppError::configuration("auth.access_ttl_minutes is too large"))?;
        let refresh_ttl = i64::try_from(config.refresh_ttl_days)
            .ok()
            .and_then(Duration::try_days)
            .ok_or_else(|| AppError::configuration("auth.refresh_ttl_days is too large"))?;

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        })
    }

    /// Issues an access token for `user_id`.
    pub fn issue_access(&self, user_id: i64) -> AppResult<IssuedToken> {
        self.issue_with_ttl(user_id, TokenKind::Access, self.access_ttl)
    }

    /// Issues a refresh token for `user_id`.
    pub fn issue_refresh(&self, user_id: i64) -> AppResult<IssuedToken> {
        self.issue_with_ttl(user_id, TokenKind::Refresh, self.refresh_ttl)
    }

    /// Issues an access + refresh pair for `user_id`.
    pub fn issue_pair(&self, user_id: i64) -> AppResult<IssuedPair> {
        Ok(IssuedPair {
            access: self.issue_access(user_id)?,
            refresh: self.issue_refresh(user_id)?,
        })
    }

    /// Issues a token of `kind` with an explicit lifetime. A negative `ttl`
    /// yields an already expired token.
    pub fn issue_with_ttl(
        &self,
        user_id: i64,
        kind: TokenKind,
        ttl: Duration,
    ) -> AppResult<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + ttl;

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
            typ: kind,
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode {kind} token: {e}")))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verifies signature, algorithm, expiry and kind, returning the claims.
    ///
    /// Every failure is reported as `InvalidToken`.
    pub fn decode(&self, token: &str, expected: TokenKind) -> AppResult<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::invalid_token("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::invalid_token("Invalid token signature")
                }
                jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => {
                    AppError::invalid_token("Unexpected token algorithm")
                }
                _ => AppError::invalid_token(format!("Token validation failed: {e}")),
            }
        })?;

        if data.claims.typ != expected {
            return Err(AppError::invalid_token(format!(
                "Invalid token type: expected {expected} token"
            )));
        }

        Ok(data.claims)
    }
}
