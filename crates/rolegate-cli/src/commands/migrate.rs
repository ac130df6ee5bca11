//! Database migration command.

use rolegate_core::error::AppError;
use rolegate_database::DatabasePool;

use crate::output;

/// Apply every pending migration.
pub async fn execute(db: &DatabasePool) -> Result<(), AppError> {
    println!("Running database migrations...");
    rolegate_database::migration::run_migrations(db.pool()).await?;
    output::print_success("All migrations applied successfully.");
    Ok(())
}
