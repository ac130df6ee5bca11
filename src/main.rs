//! Rolegate Server: role-based authentication and authorization service.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use rolegate_core::config::AppConfig;
use rolegate_core::error::AppError;
use rolegate_database::store::AuthStore;
use rolegate_database::{DatabasePool, PgAuthStore};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from `ROLEGATE_CONFIG_DIR` (default `config`) for
/// the environment named by `ROLEGATE_ENV` (default `development`).
fn load_configuration() -> Result<AppConfig, AppError> {
    let dir = std::env::var("ROLEGATE_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let env = std::env::var("ROLEGATE_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load(&dir, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Rolegate v{}", env!("CARGO_PKG_VERSION"));

    let db = DatabasePool::connect(&config.database).await?;
    rolegate_database::migration::run_migrations(db.pool()).await?;

    let store: Arc<dyn AuthStore> = Arc::new(PgAuthStore::new(db.pool().clone()));
    store.ping().await?;
    tracing::info!("Database ready");

    let state = rolegate_api::AppState::new(Arc::clone(&store), &config.auth)?;
    let app = rolegate_api::build_router(state, &config.server);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(
            rolegate_core::ErrorKind::Internal,
            format!("Failed to bind {addr}"),
            e,
        )
    })?;

    tracing::info!(%addr, "Rolegate server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| {
            AppError::with_source(rolegate_core::ErrorKind::Internal, "Server error", e)
        })?;

    db.close().await;
    tracing::info!("Rolegate server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
