//! Refresh token maintenance.

use chrono::Utc;

use rolegate_core::error::AppError;
use rolegate_database::store::{AuthStore, RefreshTokenStore, UnitOfWork};

use crate::output;

/// Delete every expired or revoked refresh token row.
pub async fn prune(store: &dyn AuthStore) -> Result<(), AppError> {
    let mut uow = store.begin().await?;
    let removed = uow.purge_refresh_tokens(Utc::now()).await?;
    uow.commit().await?;

    tracing::info!(removed, "Pruned refresh tokens");
    output::print_success(&format!("Removed {removed} expired or revoked refresh token(s)."));
    Ok(())
}
