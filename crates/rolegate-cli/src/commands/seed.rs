//! Default catalogue seeding.

use serde::Serialize;
use tabled::Tabled;

use rolegate_auth::rbac::{DEFAULT_ROLES, seed_default_catalog};
use rolegate_core::error::AppError;
use rolegate_database::store::{AuthStore, UnitOfWork};

use crate::output::{self, OutputFormat};

/// Role display row
#[derive(Debug, Serialize, Tabled)]
struct RoleRow {
    role: String,
    permissions: String,
}

/// Upsert the default roles and permissions in one transaction.
pub async fn execute(store: &dyn AuthStore, format: OutputFormat) -> Result<(), AppError> {
    let mut uow = store.begin().await?;
    let report = seed_default_catalog(uow.as_mut()).await?;
    uow.commit().await?;

    let rows: Vec<RoleRow> = DEFAULT_ROLES
        .iter()
        .map(|r| RoleRow {
            role: r.name.to_string(),
            permissions: r.permissions.join(", "),
        })
        .collect();
    output::print_list(&rows, format);
    output::print_success(&format!(
        "Seeded {} permissions and {} roles.",
        report.permissions, report.roles
    ));
    Ok(())
}
