//! Claims carried by access and refresh tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rolegate_core::error::AppError;
use rolegate_core::result::AppResult;

/// Payload embedded in every signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID rendered as a string.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Random token ID; makes every token string unique.
    pub jti: Uuid,
    /// Token kind.
    pub typ: TokenKind,
}

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived token presented on every request.
    Access,
    /// Store-backed token exchanged for a new pair.
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => write!(f, "access"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

impl Claims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> AppResult<i64> {
        self.sub
            .parse()
            .map_err(|_| AppError::invalid_token("Token subject is not a user id"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            iat: 1_700_000_000,
            exp: 1_700_001_800,
            jti: Uuid::new_v4(),
            typ: TokenKind::Access,
        }
    }

    #[test]
    fn test_user_id_parses_subject() {
        assert_eq!(claims("42").user_id().unwrap(), 42);
        assert!(claims("alice").user_id().is_err());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_value(claims("1")).unwrap();
        assert_eq!(json["typ"], "access");
        assert_eq!(TokenKind::Refresh.to_string(), "refresh");
    }
}
