//! CLI command definitions and dispatch.

pub mod migrate;
pub mod seed;
pub mod token;
pub mod user;

use clap::{Parser, Subcommand};

use rolegate_core::config::AppConfig;
use rolegate_core::error::AppError;
use rolegate_database::{DatabasePool, PgAuthStore};

use crate::output::OutputFormat;

/// Rolegate: role-based authentication service administration
#[derive(Debug, Parser)]
#[command(name = "rolegate-cli", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `default.toml` and per-environment overlays
    #[arg(short, long, default_value = "config")]
    pub config_dir: String,

    /// Environment overlay to load
    #[arg(short, long, env = "ROLEGATE_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Install or refresh the default roles and permissions
    Seed,
    /// Attach a role to a user
    AssignRole(user::AssignRoleArgs),
    /// Enable or disable a user
    SetActive(user::SetActiveArgs),
    /// Delete expired and revoked refresh tokens
    PruneTokens,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.config_dir, &self.env)?;
        let db = DatabasePool::connect(&config.database).await?;
        let store = PgAuthStore::new(db.pool().clone());

        let result = match &self.command {
            Commands::Migrate => migrate::execute(&db).await,
            Commands::Seed => seed::execute(&store, self.format).await,
            Commands::AssignRole(args) => user::assign_role(&store, args, self.format).await,
            Commands::SetActive(args) => user::set_active(&store, args, self.format).await,
            Commands::PruneTokens => token::prune(&store).await,
        };

        db.close().await;
        result
    }
}
