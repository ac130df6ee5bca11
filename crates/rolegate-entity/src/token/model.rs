//! Refresh token ledger model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted refresh token.
///
/// Only a SHA-256 fingerprint of the token string is stored; the raw token
/// is handed to the client and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RefreshToken {
    /// Row identifier.
    pub id: i64,
    /// Hex-encoded SHA-256 of the token string. Globally unique.
    pub token_hash: String,
    /// Owning user.
    pub user_id: i64,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// Set once the token is consumed by rotation or logout.
    pub revoked: bool,
    /// When the row was written.
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// A token is usable iff it is not revoked and has not expired.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && now < self.expires_at
    }
}

/// Data for persisting a newly issued refresh token.
#[derive(Debug, Clone)]
pub struct NewRefreshToken {
    /// The raw token string; the store persists its fingerprint.
    pub token: String,
    /// Owning user.
    pub user_id: i64,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}
