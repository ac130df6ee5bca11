//! PostgreSQL-backed store. Each unit of work is one database transaction.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use rolegate_core::result::AppResult;

use crate::error::map_sqlx_error;
use crate::store::{AuthStore, UnitOfWork};

/// Store that opens a sqlx transaction per unit of work.
#[derive(Debug, Clone)]
pub struct PgAuthStore {
    pool: PgPool,
}

impl PgAuthStore {
    /// Create a new store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthStore for PgAuthStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Failed to begin transaction", e))?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| map_sqlx_error("Health check failed", e))
    }
}

/// A unit of work backed by an open transaction.
///
/// Dropping it without calling [`UnitOfWork::commit`] rolls the
/// transaction back.
#[derive(Debug)]
pub struct PgUnitOfWork {
    pub(crate) tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(self: Box<Self>) -> AppResult<()> {
        let uow = *self;
        uow.tx
            .commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to commit transaction", e))
    }
}
