//! Embedded schema migrations.

use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};
use tracing::info;

use rolegate_core::error::{AppError, ErrorKind};

use crate::error::map_sqlx_error;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Applies every pending migration under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!(known = MIGRATOR.iter().count(), "Applying schema migrations");

    MIGRATOR.run(pool).await.map_err(map_migrate_error)?;

    info!("Schema is up to date");
    Ok(())
}

/// A failing statement is reported like any other store error; a history
/// that disagrees with the embedded migrations is a deployment fault.
fn map_migrate_error(err: MigrateError) -> AppError {
    match err {
        MigrateError::Execute(inner) => map_sqlx_error("Failed to apply migration", inner),
        other => AppError::with_source(
            ErrorKind::Internal,
            format!("Migration history does not match this build: {other}"),
            other,
        ),
    }
}
