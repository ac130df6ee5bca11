//! Refresh token ledger queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use rolegate_core::result::AppResult;
use rolegate_entity::token::{NewRefreshToken, RefreshToken};

use crate::error::map_sqlx_error;
use crate::postgres::PgUnitOfWork;
use crate::store::{RefreshTokenStore, token_fingerprint};

const TOKEN_COLUMNS: &str = "id, token_hash, user_id, expires_at, revoked, created_at";

#[async_trait]
impl RefreshTokenStore for PgUnitOfWork {
    async fn issue_refresh_token(&mut self, data: &NewRefreshToken) -> AppResult<RefreshToken> {
        let sql = format!(
            "INSERT INTO refresh_tokens (token_hash, user_id, expires_at) VALUES ($1, $2, $3) \
             RETURNING {TOKEN_COLUMNS}"
        );

        sqlx::query_as::<_, RefreshToken>(&sql)
            .bind(token_fingerprint(&data.token))
            .bind(data.user_id)
            .bind(data.expires_at)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to persist refresh token", e))
    }

    async fn lookup_refresh_token(&mut self, token: &str) -> AppResult<Option<RefreshToken>> {
        // Row lock serializes concurrent rotations of the same token.
        let sql = format!("SELECT {TOKEN_COLUMNS} FROM refresh_tokens WHERE token_hash = $1 FOR UPDATE");

        sqlx::query_as::<_, RefreshToken>(&sql)
            .bind(token_fingerprint(token))
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to look up refresh token", e))
    }

    async fn revoke_refresh_token(&mut self, token: &str) -> AppResult<bool> {
        let result = sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE token_hash = $1")
            .bind(token_fingerprint(token))
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to revoke refresh token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_user_refresh_tokens(&mut self, user_id: i64) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE \
             WHERE user_id = $1 AND revoked = FALSE AND expires_at > NOW()",
        )
        .bind(user_id)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to revoke user refresh tokens", e))?;

        Ok(result.rows_affected())
    }

    async fn purge_refresh_tokens(&mut self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE revoked = TRUE OR expires_at <= $1")
            .bind(now)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to purge refresh tokens", e))?;

        Ok(result.rows_affected())
    }
}
